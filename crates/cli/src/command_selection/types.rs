//! Type definitions for pick lists and UI state.
//!
//! This module defines the types shared by the pick list and the text input,
//! including the outcome of a prompt and the state of the pick list UI.

use indexmap::IndexSet;

/// Whether a pick list accepts one item or several.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PickMode {
    Single,
    Multiple,
}

/// How a pick list was closed.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum PickOutcome {
    /// Item indexes, in the order they were picked.
    Picked(Vec<usize>),
    Dismissed,
}

/// Direction to cycle through items in the pick list.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CycleDirection {
    Up,
    Down,
}

/// What a key press asks the pick list to do.
#[derive(Clone, PartialEq, Debug)]
pub enum KeyAction {
    Ignore,
    Update(UiState),
    Move(CycleDirection),
    Finish(PickOutcome),
}

/// State for the UI viewport.
///
/// Tracks the visible portion of the list when there are more items than
/// can fit on screen.
#[derive(Clone, PartialEq, Debug)]
pub struct ViewportState {
    pub offset: usize,
    pub height: u16,
    pub width: u16,
}

/// Complete UI state for the pick list.
#[derive(Clone, PartialEq, Debug)]
pub struct UiState {
    /// Highlighted row among the displayed items
    pub selected_index: usize,
    /// Viewport state for scrolling
    pub viewport: ViewportState,
    /// Current filter text
    pub filter_text: String,
    /// Item indexes toggled on in multiple mode, in pick order
    pub picked: IndexSet<usize>,
}

impl UiState {
    #[must_use]
    pub fn new(viewport: ViewportState) -> Self {
        Self {
            selected_index: 0,
            viewport,
            filter_text: String::new(),
            picked: IndexSet::new(),
        }
    }

    /// Copy of the state with a new filter and the highlight back at the top.
    #[must_use]
    pub fn with_filter(&self, filter_text: String) -> Self {
        let mut state = self.clone();
        state.filter_text = filter_text;
        state.selected_index = 0;
        state.viewport.offset = 0;
        state
    }

    /// 1-based position of `item` in the pick order, if it was picked.
    #[must_use]
    pub fn pick_position(&self, item: usize) -> Option<usize> {
        self.picked.get_index_of(&item).map(|position| position + 1)
    }
}
