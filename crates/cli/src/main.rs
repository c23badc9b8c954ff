use std::process::ExitCode;

use clap::Parser;
use log::{debug, info, warn};
use term_cuts_cli::cli_args::Args;
use term_cuts_cli::command_selection::TerminalPrompter;
use term_cuts_cli::dry_run::DryRunTerminalHost;
use term_cuts_cli::reporting::{ConsoleNotifier, KeyboardCancellation};
use term_cuts_core::batch::{
    choose_commands, find_commands, visible_commands, BatchExecutor, BatchState,
};
use term_cuts_core::config;
use term_cuts_core::error::{Error, Result};
use term_cuts_core::execution::ExecutionContext;
use term_cuts_core::file_handling::{self, Configuration};
use term_cuts_core::interaction::Notifier;
use term_cuts_core::recency::{load_or_empty, FileRecencyStore};
use term_cuts_core::terminal::{EmulatorTerminalHost, ShellTerminalHost, TerminalHost};
use term_cuts_core::visibility::{seed_tags, TagSet};

/// Tags from the command line replace the configured ones
fn get_show_tags(args: &Args, configuration: &Configuration) -> TagSet {
    match args.tag_override() {
        Some(tags) => seed_tags(tags.iter().cloned()),
        None => seed_tags(configuration.show_tags.iter().cloned()),
    }
}

fn get_terminal_host(args: &Args) -> Box<dyn TerminalHost> {
    if args.dry_run {
        Box::new(DryRunTerminalHost)
    } else if args.inline {
        Box::new(ShellTerminalHost::new(config::get_shell()))
    } else {
        Box::new(EmulatorTerminalHost::new())
    }
}

/// Runs the chosen batch. `Ok(false)` when the batch did not succeed.
fn execute() -> Result<bool> {
    let args = Args::parse();
    let mut notifier = ConsoleNotifier::new();

    let config_path = config::get_config_path(&args.config_path);
    debug!("Config path: `{config_path}`");

    let configuration = file_handling::get_configuration(&config_path)?;
    for problem in &configuration.problems {
        notifier.warning(&problem.to_string());
    }

    let show_tags = get_show_tags(&args, &configuration);
    if visible_commands(&configuration.commands, &show_tags).is_empty() {
        return Err(Error::NoVisibleCommands { path: config_path });
    }

    let store = FileRecencyStore::new(config::get_history_path(&args.history_path));
    debug!("History path: `{}`", store.path());
    let mut recency = load_or_empty(&store);

    let mut prompter = TerminalPrompter;
    let chosen = if args.command_names.is_empty() {
        choose_commands(&configuration.commands, &show_tags, &mut prompter)?
    } else {
        find_commands(&configuration.commands, &show_tags, &args.command_names)?
    };

    if chosen.is_empty() {
        info!("No commands were chosen.");
        return Ok(true);
    }

    let mut terminals = get_terminal_host(&args);
    let cancellation = KeyboardCancellation::new();
    if let Err(e) = cancellation.install_interrupt_handler() {
        warn!("Ctrl-C will end the batch without a summary: {e}");
    }

    let save_history = !(args.skip_history_save || args.dry_run);
    if !save_history {
        info!("Skipping history save was specified. Not writing picked choices.");
    }

    let report = {
        let mut context =
            ExecutionContext::new(show_tags, &mut recency, &mut prompter, &mut *terminals);
        let executor = BatchExecutor::new(&mut notifier, &cancellation);
        // History is saved after every command so an interrupted batch keeps its picks
        let mut executor = if save_history {
            executor.with_store(&store)
        } else {
            executor
        };
        executor.run(&chosen, &mut context)
    };

    let succeeded = report.state == BatchState::Succeeded;
    if succeeded {
        notifier.info(&format!("Executed: {}", report.completed.join(", ")));
    }

    Ok(succeeded)
}

fn main() -> ExitCode {
    env_logger::init();

    match execute() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
