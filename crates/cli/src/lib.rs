//! Term Cuts CLI Library
//!
//! This crate provides the command-line interface for term-cuts. It answers
//! the prompts of the core library on the terminal, reports batch progress
//! and lets the user cancel a batch from the keyboard.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing
//! - [`command_selection`]: Pick lists and text input on the terminal
//! - [`reporting`]: Progress output and keyboard cancellation
//! - [`dry_run`]: A terminal host that prints instead of running
//!
//! # Examples
//!
//! The CLI binary (`tc`) can be used in several ways:
//!
//! ```bash
//! # Pick the commands to run interactively
//! tc
//!
//! # Run named commands, in order
//! tc build deploy
//!
//! # Show commands tagged `work`, run them in the current terminal
//! tc --tag work --inline
//!
//! # Print the command lines instead of running them
//! tc --dry-run deploy
//! ```

pub mod cli_args;
pub mod command_selection;
pub mod dry_run;
pub mod reporting;
