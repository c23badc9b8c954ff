use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input was cancelled by the user.")]
    UserCancelled,

    #[error("The sub process exiting with non-success code.")]
    SubProcessExit,

    #[error("Error with sub process process: {}", _0)]
    SubProcess(#[from] std::io::Error),

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("Invalid configuration for {}: {}", .entity, .reason)]
    ConfigurationInvalid { entity: String, reason: String },

    #[error("Command history at `{}` is unavailable: {}", .path, .reason)]
    PersistenceUnavailable { path: String, reason: String },

    #[error("Could not open a terminal: {}", .0)]
    TerminalLaunch(String),

    #[error("No command named `{}` is defined or visible.", .0)]
    CommandNotFound(String),

    #[error("No visible commands were found in `{}`. Check `show_tags`.", .path)]
    NoVisibleCommands { path: String },

    #[error("Misc error: {}", .0)]
    Misc(String),
}

impl Error {
    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn configuration_invalid(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigurationInvalid {
            entity: entity.into(),
            reason: reason.into(),
        }
    }

    pub fn persistence_unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::PersistenceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error came from a dismissed prompt rather than a failure.
    #[must_use]
    pub fn is_user_cancelled(&self) -> bool {
        matches!(self, Self::UserCancelled)
    }
}
