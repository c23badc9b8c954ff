//! Capabilities the core needs from whoever is driving it.
//!
//! The core never talks to a terminal or a screen directly. It asks a
//! [`Prompter`] for answers, tells a [`Notifier`] what is happening and polls
//! a [`Cancellation`] between commands.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Result;

/// One entry of a pick list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub description: Option<String>,
}

impl PickItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PickRequest<'a> {
    pub title: &'a str,
    pub items: &'a [PickItem],
}

#[derive(Debug, Clone, Copy)]
pub struct InputRequest<'a> {
    /// Describes what is being asked for.
    pub prompt: &'a str,
    /// Hint shown while the input is empty.
    pub placeholder: Option<&'a str>,
    /// Text the input starts out with.
    pub initial_value: Option<&'a str>,
}

/// Asks the user things. `Ok(None)` means the user dismissed the prompt.
pub trait Prompter {
    /// Index into `request.items` of the picked item.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt could not be shown.
    fn pick_one(&mut self, request: &PickRequest<'_>) -> Result<Option<usize>>;

    /// Indexes into `request.items` in the order the user picked them.
    ///
    /// An empty list means nothing was picked or the prompt was dismissed.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt could not be shown.
    fn pick_many(&mut self, request: &PickRequest<'_>) -> Result<Vec<usize>>;

    /// # Errors
    ///
    /// Returns an error if the prompt could not be shown.
    fn input_text(&mut self, request: &InputRequest<'_>) -> Result<Option<String>>;
}

/// Progress and user-visible messages.
pub trait Notifier {
    /// `increment` is in percent of the whole batch.
    fn progress(&mut self, increment: f64, message: &str);
    fn info(&mut self, message: &str);
    fn warning(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

/// Polled before each command of a batch.
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

/// A shareable cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl Cancellation for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let observer = token.clone();

        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }
}
