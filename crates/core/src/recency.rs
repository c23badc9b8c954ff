//! Recently picked choices.
//!
//! Every picked choice is stamped with the time it was picked, keyed by a
//! canonical identity of the choice. Parameters with `sort_by_time` list
//! their most recently used choices first.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::command_definitions::ChoiceDefinition;
use crate::error::Result;
use crate::file_handling;

/// Canonical key for a choice.
///
/// Only `label`, `description`, `tags` and `add_tags` take part. Keys are
/// emitted in sorted order and tag sets are ordered, so neither field order
/// nor tag order in the configuration changes the identity.
#[must_use]
pub fn identity(choice: &ChoiceDefinition) -> String {
    serde_json::json!({
        "label": choice.label,
        "description": choice.description,
        "tags": choice.tags,
        "add_tags": choice.add_tags,
    })
    .to_string()
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct RecencyCache {
    entries: BTreeMap<String, u64>,
}

impl RecencyCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<u64> {
        self.entries.get(id).copied()
    }

    pub fn set(&mut self, id: String, timestamp: u64) {
        self.entries.insert(id, timestamp);
    }

    /// Last time `choice` was picked, or 0 if it never was.
    #[must_use]
    pub fn last_used(&self, choice: &ChoiceDefinition) -> u64 {
        self.get(&identity(choice)).unwrap_or(0)
    }

    pub fn touch(&mut self, choice: &ChoiceDefinition, timestamp: u64) {
        self.set(identity(choice), timestamp);
    }

    /// Stable sort, most recently picked first.
    pub fn sort_by_recency(&self, choices: &mut [&ChoiceDefinition]) {
        choices.sort_by_key(|choice| std::cmp::Reverse(self.last_used(choice)));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where the recency cache lives between runs.
pub trait RecencyStore {
    /// # Errors
    ///
    /// Returns [`crate::error::Error::PersistenceUnavailable`] if stored state
    /// exists but cannot be read.
    fn load(&self) -> Result<RecencyCache>;

    /// Replaces the whole stored cache.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::PersistenceUnavailable`] if the cache
    /// cannot be written.
    fn save(&self, cache: &RecencyCache) -> Result<()>;
}

/// YAML file backed store.
pub struct FileRecencyStore {
    path: String,
}

impl FileRecencyStore {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl RecencyStore for FileRecencyStore {
    fn load(&self) -> Result<RecencyCache> {
        file_handling::read_recency_cache(&self.path)
    }

    fn save(&self, cache: &RecencyCache) -> Result<()> {
        file_handling::write_recency_cache(&self.path, cache)
    }
}

/// Loads the cache, falling back to an empty one when the store is broken.
pub fn load_or_empty(store: &dyn RecencyStore) -> RecencyCache {
    match store.load() {
        Ok(cache) => {
            debug!("Loaded {} recency entries", cache.len());
            cache
        }
        Err(e) => {
            warn!("{e}; starting with an empty history");
            RecencyCache::new()
        }
    }
}
