//! Configuration path utilities for term-cuts.
//!
//! This module provides functions for resolving configuration file paths
//! and expanding shell variables like `~` in paths.

/// Default path for the commands configuration file
const DEFAULT_CONFIG_PATH: &str = "~/.term-cuts/commands.yml";
/// Default path for the recently picked choices
const DEFAULT_HISTORY_PATH: &str = "~/.term-cuts/recency.yml";

/// Default shell to use for inline command execution
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Resolves the configuration file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// configuration path. Shell expansions like `~` are resolved.
///
/// # Examples
///
/// ```
/// use term_cuts_core::config::get_config_path;
///
/// let default_path = get_config_path(&None);
/// assert!(default_path.ends_with("commands.yml"));
///
/// let custom_path = get_config_path(&Some("/path/to/config.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/config.yml");
/// ```
pub fn get_config_path(config_path_arg: &Option<String>) -> String {
    let config_path = match config_path_arg {
        Some(config_path) => config_path,
        None => DEFAULT_CONFIG_PATH,
    };

    shellexpand::tilde(config_path).to_string()
}

/// Resolves the recency history file path, expanding `~`.
pub fn get_history_path(history_path_arg: &Option<String>) -> String {
    let history_path = match history_path_arg {
        Some(history_path) => history_path,
        None => DEFAULT_HISTORY_PATH,
    };

    shellexpand::tilde(history_path).to_string()
}

/// The shell used for inline execution: `$SHELL`, else [`DEFAULT_SHELL`].
pub fn get_shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_path_with_custom_path() {
        let custom_path = Some("/custom/path/config.yml".to_string());
        let result = get_config_path(&custom_path);
        assert_eq!(result, "/custom/path/config.yml");
    }

    #[test]
    fn test_get_config_path_with_none() {
        let result = get_config_path(&None);
        assert!(result.ends_with(".term-cuts/commands.yml"));
        assert!(!result.starts_with('~'));
    }

    #[test]
    fn test_get_config_path_with_tilde() {
        let tilde_path = Some("~/my-config.yml".to_string());
        let result = get_config_path(&tilde_path);
        assert!(!result.starts_with('~'));
        assert!(result.ends_with("my-config.yml"));
    }

    #[test]
    fn test_get_history_path_with_custom_path() {
        let custom_path = Some("/custom/recency.yml".to_string());
        assert_eq!(get_history_path(&custom_path), "/custom/recency.yml");
    }

    #[test]
    fn test_get_history_path_with_none() {
        let result = get_history_path(&None);
        assert!(result.ends_with("recency.yml"));
        assert!(!result.starts_with('~'));
    }
}
