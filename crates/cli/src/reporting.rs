//! Console progress output and keyboard cancellation for batch runs.

use std::io::{stderr, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{debug, error, info, warn};
use term_cuts_core::interaction::{Cancellation, CancellationToken, Notifier};

/// Writes batch progress and messages to stderr.
#[derive(Default)]
pub struct ConsoleNotifier {
    percent: f64,
}

impl ConsoleNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn print(color: Color, message: &str) {
        if let Err(e) = write_line(color, message) {
            debug!("Could not write to stderr: {e}");
        }
    }
}

fn write_line(color: Color, message: &str) -> std::io::Result<()> {
    let mut stderr = stderr();
    queue!(
        stderr,
        SetForegroundColor(color),
        Print(message),
        ResetColor,
        Print("\n")
    )?;
    stderr.flush()
}

/// `message` followed by the share of the batch reached so far.
#[must_use]
pub fn progress_line(message: &str, percent: f64) -> String {
    format!("{message} ({:.0}%)", percent.min(100.0))
}

impl Notifier for ConsoleNotifier {
    fn progress(&mut self, increment: f64, message: &str) {
        self.percent += increment;
        info!("{message}");
        Self::print(Color::Cyan, &progress_line(message, self.percent));
    }

    fn info(&mut self, message: &str) {
        info!("{message}");
        Self::print(Color::Green, message);
    }

    fn warning(&mut self, message: &str) {
        warn!("{message}");
        Self::print(Color::Yellow, message);
    }

    fn error(&mut self, message: &str) {
        error!("{message}");
        Self::print(Color::Red, message);
    }
}

/// Cancels the batch when Esc or Ctrl-C was pressed since the last check.
///
/// Keys are only looked at between commands, so a running command is never
/// interrupted. While a command runs in the current terminal, Ctrl-C arrives
/// as an interrupt instead; see [`KeyboardCancellation::install_interrupt_handler`].
#[derive(Default)]
pub struct KeyboardCancellation {
    token: CancellationToken,
}

impl KeyboardCancellation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that cancels the batch when triggered.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Makes an interrupt of the process request cancellation instead of
    /// ending it, so the batch still stops at the next command and reports.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler could not be installed, or one already was.
    pub fn install_interrupt_handler(&self) -> Result<(), ctrlc::Error> {
        ctrlc::set_handler(interrupt_handler(self.token()))
    }

    fn drain_pending_keys(&self) -> std::io::Result<()> {
        enable_raw_mode()?;

        let mut drained = Ok(());
        loop {
            match event::poll(Duration::ZERO) {
                Ok(false) => break,
                Ok(true) => match event::read() {
                    Ok(Event::Key(key_event)) if is_cancel_key(key_event) => self.token.cancel(),
                    Ok(_) => {}
                    Err(e) => {
                        drained = Err(e);
                        break;
                    }
                },
                Err(e) => {
                    drained = Err(e);
                    break;
                }
            }
        }

        disable_raw_mode()?;
        drained
    }
}

impl Cancellation for KeyboardCancellation {
    fn is_cancelled(&self) -> bool {
        if !self.token.is_cancelled() {
            if let Err(e) = self.drain_pending_keys() {
                debug!("Could not read pending keys: {e}");
            }
        }

        self.token.is_cancelled()
    }
}

/// Handler run on an interrupt: cancels through `token`.
pub fn interrupt_handler(token: CancellationToken) -> impl FnMut() + Send + 'static {
    move || {
        debug!("Interrupted, stopping after the running command");
        token.cancel();
    }
}

#[must_use]
pub fn is_cancel_key(key_event: KeyEvent) -> bool {
    if key_event.kind != KeyEventKind::Press {
        return false;
    }

    match key_event.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => key_event.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line_rounds_percent() {
        assert_eq!(progress_line("[1/3] build", 100.0 / 3.0), "[1/3] build (33%)");
        assert_eq!(progress_line("[3/3] deploy", 100.000_000_1), "[3/3] deploy (100%)");
    }

    #[test]
    fn test_notifier_accumulates_progress() {
        let mut notifier = ConsoleNotifier::new();
        notifier.progress(25.0, "[1/4] a");
        notifier.progress(25.0, "[2/4] b");
        assert!((notifier.percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cancel_keys() {
        assert!(is_cancel_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_cancel_key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_cancel_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_cancel_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }

    #[test]
    fn test_interrupt_handler_trips_the_cancellation() {
        let cancellation = KeyboardCancellation::new();
        let mut handler = interrupt_handler(cancellation.token());

        handler();
        assert!(cancellation.is_cancelled());

        // A second interrupt keeps it cancelled
        handler();
        assert!(cancellation.is_cancelled());
    }

    #[test]
    fn test_triggered_token_cancels_without_polling() {
        let cancellation = KeyboardCancellation::new();
        cancellation.token().cancel();
        assert!(cancellation.is_cancelled());
    }
}
