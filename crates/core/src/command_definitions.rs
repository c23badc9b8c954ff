use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Tags declared on a command, parameter or choice.
///
/// Kept ordered so that two logically identical declarations compare and
/// serialize the same way regardless of how they were written.
pub type TagList = BTreeSet<String>;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChoiceDefinition {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagList>,
    #[serde(
        default,
        alias = "addTags",
        skip_serializing_if = "Option::is_none"
    )]
    pub add_tags: Option<TagList>,
}

impl ChoiceDefinition {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            tags: None,
            add_tags: None,
        }
    }
}

impl Display for ChoiceDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.label)?;

        if let Some(description) = &self.description {
            write!(formatter, " ({description})")?;
        }

        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(default)]
    pub tags: Option<TagList>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default, alias = "placeHolder")]
    pub placeholder: Option<String>,
    #[serde(default, alias = "sortByTime")]
    pub sort_by_time: bool,
    #[serde(default, alias = "chosen")]
    pub choices: Option<Vec<ChoiceDefinition>>,
}

impl ParameterDefinition {
    pub fn free_text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: None,
            default: None,
            placeholder: None,
            sort_by_time: false,
            choices: None,
        }
    }

    pub fn with_choices(name: impl Into<String>, choices: Vec<ChoiceDefinition>) -> Self {
        Self {
            choices: Some(choices),
            ..Self::free_text(name)
        }
    }

    /// The choice list, if this parameter is answered by picking rather than typing.
    ///
    /// An empty `choices` list in the configuration counts as free text.
    #[must_use]
    pub fn choice_list(&self) -> Option<&[ChoiceDefinition]> {
        self.choices
            .as_deref()
            .filter(|choices| !choices.is_empty())
    }
}

impl Display for ParameterDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "`{}`", self.name)?;

        if let Some(placeholder) = &self.placeholder {
            write!(formatter, " ({placeholder})")?;
        }

        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: String,
    pub command: String,
    #[serde(default, alias = "terminalName")]
    pub terminal_name: Option<String>,
    #[serde(default)]
    pub tags: Option<TagList>,
    #[serde(default, alias = "parameter")]
    pub parameters: Vec<ParameterDefinition>,
}

impl CommandDefinition {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            terminal_name: None,
            tags: None,
            parameters: Vec::new(),
        }
    }

    /// Name of the terminal session this command is launched in.
    #[must_use]
    pub fn terminal_name(&self) -> &str {
        self.terminal_name.as_deref().unwrap_or(&self.name)
    }

    /// Joins the template and the resolved parameters with single spaces.
    ///
    /// Nothing is quoted or escaped: values are passed to the shell as typed.
    #[must_use]
    pub fn build_command_line(&self, parameters: &[String]) -> String {
        std::iter::once(self.command.as_str())
            .chain(parameters.iter().map(String::as_str))
            .join(" ")
    }
}

impl Display for CommandDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.name)
    }
}

/// The whole configuration file.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ConfigurationFile {
    #[serde(default, alias = "showTags")]
    pub show_tags: Option<Vec<String>>,
    #[serde(default)]
    pub commands: Vec<serde_yaml::Value>,
}
