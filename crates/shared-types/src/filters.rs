//! Grouped categorical filter selections

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Filter key -> checked option values.
///
/// A key whose controls are all unchecked is kept with an empty set; the
/// backend decides what an empty selection means, so it must always see the
/// key. Ordered containers keep the serialized payload stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterGroup {
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl FilterGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `key` is present, even if nothing is selected under it.
    pub fn ensure_key(&mut self, key: &str) {
        if !self.groups.contains_key(key) {
            self.groups.insert(key.to_string(), BTreeSet::new());
        }
    }

    pub fn select(&mut self, key: &str, value: &str) {
        self.groups
            .entry(key.to_string())
            .or_default()
            .insert(value.to_string());
    }

    pub fn selected(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
