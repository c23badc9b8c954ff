use log::info;

use crate::command_definitions::CommandDefinition;
use crate::error::Result;
use crate::interaction::Prompter;
use crate::recency::{now_millis, RecencyCache};
use crate::resolution::ParameterResolver;
use crate::terminal::TerminalHost;
use crate::visibility::TagSet;

/// Everything a command needs to run.
pub struct ExecutionContext<'a> {
    /// Seed of the active tag set for every command.
    pub show_tags: TagSet,
    pub recency: &'a mut RecencyCache,
    pub prompter: &'a mut dyn Prompter,
    pub terminals: &'a mut dyn TerminalHost,
    pub clock: fn() -> u64,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        show_tags: TagSet,
        recency: &'a mut RecencyCache,
        prompter: &'a mut dyn Prompter,
        terminals: &'a mut dyn TerminalHost,
    ) -> Self {
        Self {
            show_tags,
            recency,
            prompter,
            terminals,
            clock: now_millis,
        }
    }
}

/// Opens a terminal for `command`, resolves its parameters and runs the
/// resulting command line in it.
///
/// # Errors
///
/// Returns whatever parameter resolution or the terminal host fails with,
/// including [`crate::error::Error::UserCancelled`].
pub fn execute_command(command: &CommandDefinition, context: &mut ExecutionContext<'_>) -> Result<()> {
    let mut terminal = context.terminals.create_terminal(command.terminal_name())?;

    let parameters = ParameterResolver::new(&mut *context.prompter, &mut *context.recency, context.clock)
        .resolve(command, &context.show_tags)?;

    let command_line = command.build_command_line(&parameters);
    info!("Executing `{}`: {command_line}", command.name);

    terminal.send_text(&command_line)?;
    terminal.show()
}
