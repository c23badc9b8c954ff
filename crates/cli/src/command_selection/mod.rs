//! Interactive pick lists and text input.
//!
//! This module provides the terminal-based user interface for term-cuts.
//! [`TerminalPrompter`] answers the prompts the core asks for while choosing
//! commands and resolving their parameters.
//!
//! # User Interface
//!
//! The pick list supports:
//! - Arrow keys or the mouse wheel to move the highlight
//! - Typing to filter items (fuzzy search)
//! - Space to toggle an item when several can be picked
//! - Enter to confirm
//! - Escape to clear the filter, or to dismiss when there is none
//! - Ctrl-C to dismiss

use std::io::stdout;

use crossterm::event::DisableMouseCapture;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use term_cuts_core::error::Result;
use term_cuts_core::interaction::{InputRequest, PickRequest, Prompter};

pub mod input;
pub mod types;
pub mod ui;

pub use input::read_input;
pub use types::{PickMode, PickOutcome};
pub use ui::pick;

/// Alternate screen in raw mode for as long as the guard lives.
struct ScreenGuard;

impl ScreenGuard {
    fn enter() -> Result<Self> {
        stdout().execute(EnterAlternateScreen)?;
        // Leaving is handled by the guard from here on
        let guard = Self;
        enable_raw_mode()?;
        Ok(guard)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

/// Prompts on the controlling terminal.
#[derive(Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn pick_one(&mut self, request: &PickRequest<'_>) -> Result<Option<usize>> {
        match pick(request, PickMode::Single)? {
            PickOutcome::Picked(indexes) => Ok(indexes.first().copied()),
            PickOutcome::Dismissed => Ok(None),
        }
    }

    fn pick_many(&mut self, request: &PickRequest<'_>) -> Result<Vec<usize>> {
        match pick(request, PickMode::Multiple)? {
            PickOutcome::Picked(indexes) => Ok(indexes),
            PickOutcome::Dismissed => Ok(Vec::new()),
        }
    }

    fn input_text(&mut self, request: &InputRequest<'_>) -> Result<Option<String>> {
        read_input(request)
    }
}
