//! Term Cuts Core Library
//!
//! This crate provides the core functionality for term-cuts, a tool that lets
//! users pick named shell command templates, fill in their parameters and run
//! them in freshly created terminal sessions, one after the other.
//!
//! # Key Features
//!
//! - **Command Definitions**: Parse and validate YAML-based command configurations
//! - **Tag Visibility**: Hide commands, parameters and choices behind tags
//! - **Parameter Resolution**: Free text or pick-list parameters, with tags
//!   granted by picked choices
//! - **Recency Ranking**: Persisted history of picked choices
//! - **Batch Execution**: Sequential, cancellable execution with progress
//!
//! The core never talks to the user directly. It is driven through the
//! traits in [`interaction`] and [`terminal`].
//!
//! # Examples
//!
//! Loading the configuration:
//!
//! ```no_run
//! use term_cuts_core::config::get_config_path;
//! use term_cuts_core::file_handling::get_configuration;
//!
//! let configuration = get_configuration(&get_config_path(&None))?;
//! for command in &configuration.commands {
//!     println!("Command: {}", command);
//! }
//! # Ok::<(), term_cuts_core::error::Error>(())
//! ```

pub mod batch;
pub mod command_definitions;
pub mod config;
pub mod error;
pub mod execution;
pub mod file_handling;
pub mod interaction;
pub mod recency;
pub mod resolution;
pub mod terminal;
pub mod visibility;
