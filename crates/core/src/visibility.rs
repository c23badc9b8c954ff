//! Tag based visibility of commands, parameters and choices.
//!
//! An entity without tags is always shown. An entity that declares tags is
//! shown only when at least one of them is active. With no active tags at
//! all, every tagged entity is hidden.

use indexmap::IndexSet;

use crate::command_definitions::{
    ChoiceDefinition, CommandDefinition, ParameterDefinition, TagList,
};

/// Tags in effect while resolving one command, in the order they were granted.
pub type TagSet = IndexSet<String>;

/// Anything that can be hidden behind tags.
pub trait Taggable {
    fn tags(&self) -> Option<&TagList>;
}

impl Taggable for CommandDefinition {
    fn tags(&self) -> Option<&TagList> {
        self.tags.as_ref()
    }
}

impl Taggable for ParameterDefinition {
    fn tags(&self) -> Option<&TagList> {
        self.tags.as_ref()
    }
}

impl Taggable for ChoiceDefinition {
    fn tags(&self) -> Option<&TagList> {
        self.tags.as_ref()
    }
}

/// Untagged entities are always visible. Tagged ones need at least one of
/// their tags to be active, so an empty active set hides them.
#[must_use]
pub fn is_visible<T: Taggable + ?Sized>(entity: &T, active_tags: &TagSet) -> bool {
    match entity.tags() {
        None => true,
        Some(tags) => tags.iter().any(|tag| active_tags.contains(tag)),
    }
}

/// Builds the seed tag set from the configured show tags.
pub fn seed_tags<I, S>(show_tags: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    show_tags.into_iter().map(Into::into).collect()
}
