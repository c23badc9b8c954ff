use std::fmt::Display;
use std::io::{stdout, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{
    self, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::style::Color::{DarkBlue, DarkGreen, Reset, Yellow};
use crossterm::style::{
    Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{queue, ExecutableCommand};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use term_cuts_core::error::Result;
use term_cuts_core::interaction::{PickItem, PickRequest};

use super::types::CycleDirection::{Down, Up};
use super::types::{CycleDirection, KeyAction, PickMode, PickOutcome, UiState, ViewportState};
use super::ScreenGuard;

/// Rows taken by the header and the filter line
const CHROME_ROWS: u16 = 2;

/// Shows `request` as a pick list until the user confirms or dismisses it.
///
/// # Errors
///
/// Returns an error if the terminal cannot be driven.
pub fn pick(request: &PickRequest<'_>, mode: PickMode) -> Result<PickOutcome> {
    let _screen_guard = ScreenGuard::enter()?; // Restores the terminal when dropped
    stdout().execute(EnableMouseCapture)?;

    let (width, height) = terminal::size()?;
    let mut ui_state = UiState::new(ViewportState {
        offset: 0,
        height: height.saturating_sub(CHROME_ROWS),
        width,
    });

    let mut displayed = filter_displayed_indexes(request.items, &ui_state.filter_text);
    let mut needs_redraw = true;
    let mut down_row: Option<u16> = None;

    loop {
        if needs_redraw {
            redraw_ui(request, mode, &ui_state, &displayed)?;
            needs_redraw = false;
        }

        if !event::poll(Duration::from_millis(500))? {
            continue;
        }

        let action = match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                handle_key_event(key_event, &ui_state, &displayed, mode)
            }
            Event::Mouse(mouse_event) => {
                handle_mouse_event(mouse_event, &ui_state, &displayed, mode, &mut down_row)
            }
            Event::Resize(width, height) => {
                KeyAction::Update(handle_resize(width, height, &ui_state, displayed.len()))
            }
            _ => KeyAction::Ignore,
        };

        let new_state = match action {
            KeyAction::Ignore => continue,
            KeyAction::Finish(outcome) => return Ok(outcome),
            KeyAction::Move(direction) => move_selected_index(&ui_state, displayed.len(), direction),
            KeyAction::Update(state) => state,
        };

        if new_state.filter_text != ui_state.filter_text {
            displayed = filter_displayed_indexes(request.items, &new_state.filter_text);
        }

        if new_state != ui_state {
            ui_state = new_state;
            needs_redraw = true;
        }
    }
}

/// Handle keyboard events in the pick list
pub fn handle_key_event(
    key_event: KeyEvent,
    ui_state: &UiState,
    displayed: &[usize],
    mode: PickMode,
) -> KeyAction {
    let highlighted = displayed.get(ui_state.selected_index).copied();

    match key_event.code {
        KeyCode::Up => KeyAction::Move(Up),
        KeyCode::Down => KeyAction::Move(Down),
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::Finish(PickOutcome::Dismissed)
        }
        KeyCode::Enter => match mode {
            PickMode::Multiple if !ui_state.picked.is_empty() => KeyAction::Finish(
                PickOutcome::Picked(ui_state.picked.iter().copied().collect()),
            ),
            // Nothing toggled: the highlighted item is the pick
            _ => highlighted.map_or(KeyAction::Ignore, |item| {
                KeyAction::Finish(PickOutcome::Picked(vec![item]))
            }),
        },
        KeyCode::Char(' ') if mode == PickMode::Multiple => {
            highlighted.map_or(KeyAction::Ignore, |item| {
                KeyAction::Update(toggle_picked(ui_state, item))
            })
        }
        KeyCode::Esc => {
            if ui_state.filter_text.is_empty() {
                KeyAction::Finish(PickOutcome::Dismissed)
            } else {
                KeyAction::Update(ui_state.with_filter(String::new()))
            }
        }
        KeyCode::Backspace => {
            if ui_state.filter_text.is_empty() {
                return KeyAction::Ignore;
            }

            let mut filter_text = ui_state.filter_text.clone();
            filter_text.pop();
            KeyAction::Update(ui_state.with_filter(filter_text))
        }
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut filter_text = ui_state.filter_text.clone();
            filter_text.push(c);
            KeyAction::Update(ui_state.with_filter(filter_text))
        }
        _ => KeyAction::Ignore,
    }
}

/// Wheel moves the highlight, a left click acts like space or enter on the row
fn handle_mouse_event(
    mouse_event: MouseEvent,
    ui_state: &UiState,
    displayed: &[usize],
    mode: PickMode,
    down_row: &mut Option<u16>,
) -> KeyAction {
    if mouse_event.modifiers != KeyModifiers::NONE {
        return KeyAction::Ignore;
    }

    match mouse_event.kind {
        MouseEventKind::ScrollDown => KeyAction::Move(Down),
        MouseEventKind::ScrollUp => KeyAction::Move(Up),
        MouseEventKind::Down(MouseButton::Left) => {
            *down_row = Some(mouse_event.row);
            KeyAction::Ignore
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(row) = down_row.take() else {
                return KeyAction::Ignore;
            };

            // Header row, or below the last visible item
            if row == 0 || row > ui_state.viewport.height {
                return KeyAction::Ignore;
            }

            let clicked_index = (row - 1) as usize + ui_state.viewport.offset;
            let Some(&item) = displayed.get(clicked_index) else {
                return KeyAction::Ignore;
            };

            match mode {
                PickMode::Single => KeyAction::Finish(PickOutcome::Picked(vec![item])),
                PickMode::Multiple => {
                    let mut state = toggle_picked(ui_state, item);
                    state.selected_index = clicked_index;
                    KeyAction::Update(state)
                }
            }
        }
        _ => KeyAction::Ignore,
    }
}

fn toggle_picked(ui_state: &UiState, item: usize) -> UiState {
    let mut state = ui_state.clone();
    if !state.picked.shift_remove(&item) {
        state.picked.insert(item);
    }
    state
}

/// Handle window resize events
fn handle_resize(width: u16, height: u16, ui_state: &UiState, displayed_count: usize) -> UiState {
    let new_height = height.saturating_sub(CHROME_ROWS);
    let mut ui_state = ui_state.clone();
    let mut new_viewport = ViewportState {
        width,
        height: new_height,
        offset: ui_state.viewport.offset,
    };

    // If growing taller, try to show more items above current selection
    match new_height.cmp(&ui_state.viewport.height) {
        std::cmp::Ordering::Greater if new_viewport.offset > 0 => {
            let height_increase = new_height - ui_state.viewport.height;
            new_viewport.offset = new_viewport.offset.saturating_sub(height_increase as usize);
        }
        std::cmp::Ordering::Less
            if ui_state.selected_index >= new_viewport.offset + new_height as usize =>
        {
            new_viewport.offset = (ui_state.selected_index + 1).saturating_sub(new_height as usize);

            if new_viewport.offset + new_height as usize > displayed_count {
                new_viewport.offset = displayed_count.saturating_sub(new_height as usize);
            }
        }
        _ => {}
    }

    ui_state.viewport = new_viewport;
    ui_state
}

/// Move the selected index in the given direction, wrapping around
pub fn move_selected_index(
    ui_state: &UiState,
    displayed_count: usize,
    direction: CycleDirection,
) -> UiState {
    if displayed_count == 0 {
        return ui_state.clone();
    }

    let mut new_index = ui_state.selected_index;
    let mut ui_state = ui_state.clone();
    let height = ui_state.viewport.height as usize;

    match direction {
        Up => {
            if new_index == 0 {
                new_index = displayed_count - 1;
                ui_state.viewport.offset = new_index.saturating_sub(height.saturating_sub(1));
            } else {
                new_index -= 1;
                if new_index < ui_state.viewport.offset {
                    ui_state.viewport.offset = new_index;
                }
            }
        }
        Down => {
            new_index = (new_index + 1) % displayed_count;
            if new_index < ui_state.selected_index {
                ui_state.viewport.offset = 0;
            } else if new_index >= ui_state.viewport.offset + height {
                ui_state.viewport.offset = (new_index + 1).saturating_sub(height);
            }
        }
    }

    ui_state.selected_index = new_index;
    ui_state
}

/// Indexes of the items matching `filter`, in their original order
pub fn filter_displayed_indexes(items: &[PickItem], filter: &str) -> Vec<usize> {
    if filter.is_empty() {
        return (0..items.len()).collect();
    }

    let matcher = SkimMatcherV2::default();

    items
        .iter()
        .enumerate()
        .filter(|(_, item)| matcher.fuzzy_match(&item_text(item), filter).is_some())
        .map(|(index, _)| index)
        .collect()
}

fn item_text(item: &PickItem) -> String {
    match &item.description {
        Some(description) => format!("{} - {description}", item.label),
        None => item.label.clone(),
    }
}

/// Truncate or pad `text` so it fills exactly `width` columns
fn fit_to_width(text: &str, width: u16) -> String {
    let width = width as usize;
    let mut fitted: String = text.chars().take(width).collect();
    let length = fitted.chars().count();
    fitted.push_str(&" ".repeat(width - length));
    fitted
}

/// Pad a value to match the width of the largest value
fn pad_to_width_of<T: Display>(value: T, max_number: usize) -> String {
    let width = format!("{max_number}").len();
    format!("{:>width$}", value.to_string())
}

fn redraw_ui(
    request: &PickRequest<'_>,
    mode: PickMode,
    ui_state: &UiState,
    displayed: &[usize],
) -> Result<()> {
    let mut stdout = stdout();

    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    print_header(request.title, mode, ui_state, displayed.len())?;

    if displayed.is_empty() {
        queue!(
            stdout,
            MoveTo(0, 1),
            SetForegroundColor(Color::Red),
            Print("No matching items!"),
            SetAttribute(Attribute::Reset),
        )?;
    } else {
        print_items_with_selection(request.items, mode, ui_state, displayed)?;
    }

    queue!(
        stdout,
        MoveTo(0, ui_state.viewport.height + 1),
        SetAttribute(Attribute::Bold),
        Print(format!("Filter: {}", ui_state.filter_text)),
        SetAttribute(Attribute::Reset)
    )?;

    stdout.flush()?;
    Ok(())
}

/// Print the header for the pick list
fn print_header(title: &str, mode: PickMode, ui_state: &UiState, displayed_count: usize) -> Result<()> {
    let mut stdout = stdout();

    let keys = match mode {
        PickMode::Single => "<enter>: Pick   <esc>: Cancel",
        PickMode::Multiple => "<space>: Toggle   <enter>: Run   <esc>: Quit",
    };

    let header = format!(
        "  {title}   |   {keys}   |   {}/{displayed_count}",
        pad_to_width_of(ui_state.selected_index + 1, displayed_count),
    );

    queue!(
        stdout,
        MoveTo(0, 0),
        SetBackgroundColor(DarkGreen),
        Print(fit_to_width(&header, ui_state.viewport.width)),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

/// Print the visible items with the highlighted one in color
fn print_items_with_selection(
    items: &[PickItem],
    mode: PickMode,
    ui_state: &UiState,
    displayed: &[usize],
) -> Result<()> {
    let mut stdout = stdout();
    let viewport = &ui_state.viewport;

    let visible_items = displayed
        .iter()
        .enumerate()
        .skip(viewport.offset)
        .take(viewport.height as usize);

    for (row, (displayed_index, &item_index)) in (1u16..).zip(visible_items) {
        let marker = match (mode, ui_state.pick_position(item_index)) {
            (PickMode::Single, _) => String::new(),
            (PickMode::Multiple, Some(position)) => format!("[{position}] "),
            (PickMode::Multiple, None) => "[ ] ".to_string(),
        };
        let content = format!("{marker}{}", item_text(&items[item_index]));

        queue!(stdout, MoveTo(0, row), Clear(ClearType::CurrentLine))?;

        if displayed_index == ui_state.selected_index {
            queue!(
                stdout,
                SetAttribute(Attribute::Bold),
                SetBackgroundColor(DarkBlue),
                SetForegroundColor(Yellow),
            )?;
        }

        queue!(
            stdout,
            Print(fit_to_width(&content, viewport.width)),
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(Reset),
            SetForegroundColor(Reset),
        )?;
    }

    Ok(())
}
