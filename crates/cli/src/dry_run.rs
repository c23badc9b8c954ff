//! A terminal host that only prints what would run.

use term_cuts_core::error::Result;
use term_cuts_core::terminal::{TerminalHost, TerminalSession};

#[derive(Default)]
pub struct DryRunTerminalHost;

impl TerminalHost for DryRunTerminalHost {
    fn create_terminal(&mut self, name: &str) -> Result<Box<dyn TerminalSession>> {
        Ok(Box::new(DryRunSession {
            name: name.to_string(),
            lines: Vec::new(),
        }))
    }
}

struct DryRunSession {
    name: String,
    lines: Vec<String>,
}

impl TerminalSession for DryRunSession {
    fn send_text(&mut self, text: &str) -> Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }

    fn show(&mut self) -> Result<()> {
        println!("{}", describe(&self.name, &self.lines));
        Ok(())
    }
}

/// `<terminal name>: <command line>`, one command line after another.
#[must_use]
pub fn describe(name: &str, lines: &[String]) -> String {
    format!("{name}: {}", lines.join("; "))
}
