//! Command-line argument parsing.
//!
//! This module defines the command-line interface structure using the
//! `clap` crate.

use clap::Parser;

/// Command-line arguments for the term-cuts CLI tool.
///
/// Without command names the user picks the commands to run interactively.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use term_cuts_cli::cli_args::Args;
///
/// let args = Args::parse_from(["tc", "--tag", "work", "deploy"]);
/// assert_eq!(args.command_names, vec!["deploy"]);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
#[allow(clippy::struct_excessive_bools)] // silence clippy's warning on this struct
pub struct Args {
    /// Path to the commands definition config file YAML.
    ///
    /// If not provided, defaults to `~/.term-cuts/commands.yml`.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,

    /// Path to the file that remembers when choices were last picked.
    ///
    /// If not provided, defaults to `~/.term-cuts/recency.yml`.
    #[arg(long, short = 'H')]
    pub history_path: Option<String>,

    /// Tag to show. Replaces the configured `show_tags` when given.
    ///
    /// Multiple tags can be provided with repeated `-t` flags.
    #[arg(long = "tag", short = 't', action = clap::ArgAction::Append)]
    pub tags: Vec<String>,

    /// Run commands in the current terminal instead of opening new ones.
    #[arg(long, short = 'i', action)]
    pub inline: bool,

    /// Print the command lines instead of running them.
    ///
    /// Parameters are still prompted for. History is not saved.
    #[arg(long, short = 'd', action)]
    pub dry_run: bool,

    /// Do not save the picked choices to the history file.
    #[arg(long, short = 's', action)]
    pub skip_history_save: bool,

    /// Names of the commands to run, in order.
    ///
    /// If not provided, the commands are picked interactively.
    pub command_names: Vec<String>,
}

impl Args {
    /// Tags given on the command line, if any.
    #[must_use]
    pub fn tag_override(&self) -> Option<&[String]> {
        if self.tags.is_empty() {
            None
        } else {
            Some(&self.tags)
        }
    }
}
