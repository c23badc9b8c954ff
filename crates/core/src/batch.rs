//! Sequential execution of a user-chosen list of commands.
//!
//! Commands run one at a time in the order they were chosen. Cancellation is
//! checked before each command; a command already running is never
//! interrupted. The first failure ends the batch, and the user is told which
//! commands ran and which did not. A command that fails after cancellation
//! was requested counts as cancelled, not failed.

use itertools::Itertools;
use log::{debug, warn};

use crate::command_definitions::CommandDefinition;
use crate::error::{Error, Result};
use crate::execution::{execute_command, ExecutionContext};
use crate::interaction::{Cancellation, Notifier, PickItem, PickRequest, Prompter};
use crate::recency::{RecencyCache, RecencyStore};
use crate::visibility::{is_visible, TagSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    Running,
    Succeeded,
    Cancelled,
    Failed(String),
}

impl BatchState {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }
}

/// What a batch run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub state: BatchState,
    pub completed: Vec<String>,
    pub not_executed: Vec<String>,
}

pub struct BatchExecutor<'a> {
    notifier: &'a mut dyn Notifier,
    cancellation: &'a dyn Cancellation,
    store: Option<&'a dyn RecencyStore>,
    save_failed: bool,
    state: BatchState,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(notifier: &'a mut dyn Notifier, cancellation: &'a dyn Cancellation) -> Self {
        Self {
            notifier,
            cancellation,
            store: None,
            save_failed: false,
            state: BatchState::Pending,
        }
    }

    /// Saves the recency cache to `store` after every command.
    #[must_use]
    pub fn with_store(mut self, store: &'a dyn RecencyStore) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn state(&self) -> &BatchState {
        &self.state
    }

    /// Runs `commands` in order until one fails or cancellation is requested.
    pub fn run(
        &mut self,
        commands: &[CommandDefinition],
        context: &mut ExecutionContext<'_>,
    ) -> BatchReport {
        if commands.is_empty() {
            self.state = BatchState::Succeeded;
            return self.report(commands, 0);
        }

        self.state = BatchState::Running;
        let total = commands.len();
        let increment = 100.0 / total as f64;

        for (index, command) in commands.iter().enumerate() {
            if self.cancellation.is_cancelled() {
                debug!("Batch cancelled before `{}`", command.name);
                self.report_stopped(commands, index);
                self.state = BatchState::Cancelled;
                return self.report(commands, index);
            }

            self.notifier.progress(
                increment,
                &format!("[{}/{total}] {}", index + 1, command.name),
            );

            let outcome = execute_command(command, context);
            self.save_recency(&*context.recency);

            if let Err(e) = outcome {
                if self.cancellation.is_cancelled() {
                    debug!("`{}` was interrupted: {e}", command.name);
                    self.report_stopped(commands, index);
                    self.state = BatchState::Cancelled;
                    return self.report(commands, index);
                }

                if e.is_user_cancelled() {
                    debug!("Prompt for `{}` was dismissed", command.name);
                } else {
                    warn!("Command `{}` failed: {e}", command.name);
                }
                self.notifier
                    .error(&format!("Error executing {}: {e}", command.name));
                self.report_stopped(commands, index);
                self.state = BatchState::Failed(e.to_string());
                return self.report(commands, index);
            }
        }

        self.state = BatchState::Succeeded;
        self.report(commands, total)
    }

    fn save_recency(&mut self, recency: &RecencyCache) {
        let Some(store) = self.store else {
            return;
        };

        if let Err(e) = store.save(recency) {
            warn!("{e}");
            // One warning per batch is enough
            if !self.save_failed {
                self.notifier.warning(&e.to_string());
            }
            self.save_failed = true;
        }
    }

    fn report_stopped(&mut self, commands: &[CommandDefinition], stopped_at: usize) {
        if stopped_at > 0 {
            self.notifier.info(&format!(
                "Already executed: {}",
                names(&commands[..stopped_at]).join(", ")
            ));
        }

        self.notifier.warning(&format!(
            "Not executed: {}",
            names(&commands[stopped_at..]).join(", ")
        ));
    }

    fn report(&self, commands: &[CommandDefinition], stopped_at: usize) -> BatchReport {
        BatchReport {
            state: self.state.clone(),
            completed: names(&commands[..stopped_at]),
            not_executed: names(&commands[stopped_at..]),
        }
    }
}

fn names(commands: &[CommandDefinition]) -> Vec<String> {
    commands.iter().map(|command| command.name.clone()).collect()
}

/// Commands visible under `show_tags`, in configuration order.
#[must_use]
pub fn visible_commands<'c>(
    commands: &'c [CommandDefinition],
    show_tags: &TagSet,
) -> Vec<&'c CommandDefinition> {
    commands
        .iter()
        .filter(|command| is_visible(*command, show_tags))
        .collect()
}

/// Lets the user choose the commands of a batch, in the order they pick them.
///
/// # Errors
///
/// Returns an error if the prompt cannot be shown.
pub fn choose_commands(
    commands: &[CommandDefinition],
    show_tags: &TagSet,
    prompter: &mut dyn Prompter,
) -> Result<Vec<CommandDefinition>> {
    let visible = visible_commands(commands, show_tags);
    let items: Vec<PickItem> = visible
        .iter()
        .map(|command| PickItem {
            label: command.name.clone(),
            description: Some(command.command.clone()),
        })
        .collect();

    let picked = prompter.pick_many(&PickRequest {
        title: "Choose commands to run",
        items: &items,
    })?;

    Ok(picked
        .into_iter()
        .filter_map(|index| visible.get(index).map(|command| (*command).clone()))
        .unique_by(|command| command.name.clone())
        .collect())
}

/// Looks up commands by name, keeping the order the names were given in.
///
/// A name given more than once is run once, at its first position, the same
/// as picking it twice in [`choose_commands`].
///
/// # Errors
///
/// Returns [`Error::CommandNotFound`] for a name that is not defined or not
/// visible under `show_tags`.
pub fn find_commands(
    commands: &[CommandDefinition],
    show_tags: &TagSet,
    names: &[String],
) -> Result<Vec<CommandDefinition>> {
    let visible = visible_commands(commands, show_tags);

    names
        .iter()
        .unique()
        .map(|name| {
            visible
                .iter()
                .find(|command| command.name == *name)
                .map(|command| (*command).clone())
                .ok_or_else(|| Error::CommandNotFound(name.clone()))
        })
        .collect()
}
