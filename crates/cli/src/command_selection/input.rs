use std::io::{stdout, Write};
use std::time::Duration;

use crossterm::cursor::{self, MoveTo};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Color::{DarkGreen, DarkGrey, Reset};
use crossterm::style::{Print, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use term_cuts_core::error::Result;
use term_cuts_core::interaction::InputRequest;

use super::ScreenGuard;

/// What a key press does to the line being edited.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum InputAction {
    Ignore,
    Update(String),
    Submit(String),
    Dismiss,
}

/// Apply a key press to the current input `value`
#[must_use]
pub fn apply_key(key_event: KeyEvent, value: &str) -> InputAction {
    let control = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key_event.code {
        KeyCode::Enter => InputAction::Submit(value.to_string()),
        KeyCode::Esc => InputAction::Dismiss,
        KeyCode::Char('c') if control => InputAction::Dismiss,
        KeyCode::Char('u') if control => InputAction::Update(String::new()),
        KeyCode::Backspace if !value.is_empty() => {
            let mut value = value.to_string();
            value.pop();
            InputAction::Update(value)
        }
        KeyCode::Char(c) if !control => {
            let mut value = value.to_string();
            value.push(c);
            InputAction::Update(value)
        }
        _ => InputAction::Ignore,
    }
}

/// Reads one line of text. `Ok(None)` when the user dismissed the prompt.
///
/// # Errors
///
/// Returns an error if the terminal cannot be driven.
pub fn read_input(request: &InputRequest<'_>) -> Result<Option<String>> {
    let _screen_guard = ScreenGuard::enter()?; // Restores the terminal when dropped
    let mut value = request.initial_value.unwrap_or_default().to_string();

    draw_input(request, &value)?;

    loop {
        if !event::poll(Duration::from_millis(500))? {
            continue;
        }

        let action = match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                apply_key(key_event, &value)
            }
            Event::Paste(text) => InputAction::Update(format!("{value}{text}")),
            Event::Resize(_, _) => InputAction::Update(value.clone()),
            _ => InputAction::Ignore,
        };

        match action {
            InputAction::Ignore => {}
            InputAction::Submit(value) => return Ok(Some(value)),
            InputAction::Dismiss => return Ok(None),
            InputAction::Update(new_value) => {
                value = new_value;
                draw_input(request, &value)?;
            }
        }
    }
}

fn draw_input(request: &InputRequest<'_>, value: &str) -> Result<()> {
    let mut stdout = stdout();
    let (width, _) = terminal::size()?;

    let header = format!("  {}   |   <enter>: Accept   <esc>: Cancel", request.prompt);
    let padding = " ".repeat((width as usize).saturating_sub(header.chars().count()));

    queue!(
        stdout,
        Clear(ClearType::All),
        MoveTo(0, 0),
        SetBackgroundColor(DarkGreen),
        Print(header),
        Print(padding),
        SetBackgroundColor(Reset),
        MoveTo(0, 2),
        Print("> "),
    )?;

    match request.placeholder {
        Some(placeholder) if value.is_empty() => {
            queue!(
                stdout,
                SetForegroundColor(DarkGrey),
                Print(placeholder),
                SetForegroundColor(Reset),
                MoveTo(2, 2),
            )?;
        }
        _ => queue!(stdout, Print(value))?,
    }

    execute!(stdout, cursor::Show)?;
    stdout.flush()?;
    Ok(())
}
