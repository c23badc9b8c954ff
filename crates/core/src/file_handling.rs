//! File handling and validation for term-cuts configuration.
//!
//! This module reads the command configuration, validating each command
//! entry on its own so that one broken entry does not hide the others, and
//! reads and writes the recency history file.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use log::{debug, warn};

use crate::command_definitions::{CommandDefinition, ConfigurationFile};
use crate::error::{Error, Result};
use crate::recency::RecencyCache;

/// A loaded configuration.
#[derive(Debug, Default)]
pub struct Configuration {
    /// Seed of the active tag set.
    pub show_tags: Vec<String>,
    /// Commands that loaded and validated.
    pub commands: Vec<CommandDefinition>,
    /// One [`Error::ConfigurationInvalid`] per skipped command entry.
    pub problems: Vec<Error>,
}

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    File::open(path)
        .map_err(|e| Error::io_error(file_description.to_string(), path.to_string(), e))
}

fn describe_entry(index: usize, entry: &serde_yaml::Value) -> String {
    match entry.get("name").and_then(serde_yaml::Value::as_str) {
        Some(name) => format!("command `{name}`"),
        None => format!("command #{}", index + 1),
    }
}

fn validate_command(command: &CommandDefinition) -> std::result::Result<(), String> {
    if command.name.trim().is_empty() {
        return Err("name may not be empty".to_string());
    }

    for parameter in &command.parameters {
        let Some(choices) = parameter.choice_list() else {
            continue;
        };

        let mut labels = HashSet::new();
        for choice in choices {
            if !labels.insert(choice.label.as_str()) {
                return Err(format!(
                    "parameter `{}` has a non-unique choice label `{}`",
                    parameter.name, choice.label
                ));
            }
        }
    }

    Ok(())
}

/// Turns the raw command entries into validated commands.
///
/// Entries that fail to deserialize or validate are skipped and reported in
/// [`Configuration::problems`]. When two commands share a name the first
/// one wins.
#[must_use]
pub fn parse_configuration(file: ConfigurationFile) -> Configuration {
    let mut commands = Vec::new();
    let mut problems = Vec::new();
    let mut names = HashSet::new();

    for (index, entry) in file.commands.into_iter().enumerate() {
        let entity = describe_entry(index, &entry);

        let command = match serde_yaml::from_value::<CommandDefinition>(entry) {
            Ok(command) => command,
            Err(e) => {
                warn!("Skipping {entity}: {e}");
                problems.push(Error::configuration_invalid(entity, e.to_string()));
                continue;
            }
        };

        if let Err(reason) = validate_command(&command) {
            warn!("Skipping {entity}: {reason}");
            problems.push(Error::configuration_invalid(entity, reason));
            continue;
        }

        if !names.insert(command.name.clone()) {
            let reason = "a command with this name is already defined".to_string();
            warn!("Skipping duplicate {entity}");
            problems.push(Error::configuration_invalid(entity, reason));
            continue;
        }

        commands.push(command);
    }

    Configuration {
        show_tags: file.show_tags.unwrap_or_default(),
        commands,
        problems,
    }
}

/// Loads the configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML as a
/// whole. Problems with individual command entries are not errors; they are
/// collected in [`Configuration::problems`].
///
/// # Examples
///
/// ```no_run
/// use term_cuts_core::file_handling::get_configuration;
///
/// let configuration = get_configuration("/home/me/.term-cuts/commands.yml")?;
/// println!("Loaded {} commands", configuration.commands.len());
/// # Ok::<(), term_cuts_core::error::Error>(())
/// ```
pub fn get_configuration(config_path: &str) -> Result<Configuration> {
    let config_reader = get_reader("config", config_path)?;

    let file: ConfigurationFile = serde_yaml::from_reader(config_reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "config".to_string(),
            config_path.to_string(),
            e,
        )
    })?;

    let configuration = parse_configuration(file);
    debug!(
        "Loaded {} commands ({} skipped) from `{config_path}`",
        configuration.commands.len(),
        configuration.problems.len()
    );

    Ok(configuration)
}

/// Reads the recency history. A missing file is an empty history.
///
/// # Errors
///
/// Returns [`Error::PersistenceUnavailable`] if the file exists but cannot be
/// read or parsed.
pub fn read_recency_cache(path: &str) -> Result<RecencyCache> {
    if !Path::new(path).exists() {
        return Ok(RecencyCache::new());
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| Error::persistence_unavailable(path, e))?;

    if content.trim().is_empty() {
        return Ok(RecencyCache::new());
    }

    serde_yaml::from_str(&content).map_err(|e| Error::persistence_unavailable(path, e))
}

/// Writes the recency history, replacing the previous file atomically.
///
/// The content goes to a temporary file next to `path` which is then renamed
/// over it, so a crash mid-write leaves the previous history intact.
///
/// # Errors
///
/// Returns [`Error::PersistenceUnavailable`] if the directory cannot be
/// created or the file cannot be written or renamed.
pub fn write_recency_cache(path: &str, cache: &RecencyCache) -> Result<()> {
    let destination = Path::new(path);
    let parent_dir = destination
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent_dir).map_err(|e| Error::persistence_unavailable(path, e))?;

    let content =
        serde_yaml::to_string(cache).map_err(|e| Error::persistence_unavailable(path, e))?;

    let file_name = destination
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("recency");
    let temp_path = parent_dir.join(format!(".{file_name}.tmp-{}", std::process::id()));

    std::fs::write(&temp_path, content).map_err(|e| Error::persistence_unavailable(path, e))?;
    std::fs::rename(&temp_path, destination).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        Error::persistence_unavailable(path, e)
    })
}
