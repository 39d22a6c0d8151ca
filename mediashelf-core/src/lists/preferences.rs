//! Persisted per-list sort preferences.

use crate::query::{SortDirection, SortKey, SortSpec};
use mediashelf_model::ListId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored sort choice. A missing direction means the key's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortPreference {
    pub key: SortKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
}

impl SortPreference {
    pub fn new(key: SortKey) -> Self {
        Self {
            key,
            direction: None,
        }
    }

    pub fn with_direction(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key,
            direction: Some(direction),
        }
    }

    pub fn spec(&self) -> SortSpec {
        match self.direction {
            Some(direction) => SortSpec::with_direction(self.key, direction),
            None => SortSpec::new(self.key),
        }
    }
}

impl Default for SortPreference {
    fn default() -> Self {
        SortPreference::new(SortKey::Title)
    }
}

impl From<SortSpec> for SortPreference {
    fn from(spec: SortSpec) -> Self {
        SortPreference::with_direction(spec.key, spec.direction)
    }
}

/// Sort preferences keyed by list identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortPreferences(BTreeMap<ListId, SortPreference>);

impl SortPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, list: ListId) -> Option<SortPreference> {
        self.0.get(&list).copied()
    }

    pub fn remember(&mut self, list: ListId, preference: impl Into<SortPreference>) {
        self.0.insert(list, preference.into());
    }

    pub fn forget(&mut self, list: ListId) -> Option<SortPreference> {
        self.0.remove(&list)
    }

    /// Stored preference for `list`, or `fallback` when none was saved
    pub fn spec_for(&self, list: ListId, fallback: SortSpec) -> SortSpec {
        self.get(list).map(|pref| pref.spec()).unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}
