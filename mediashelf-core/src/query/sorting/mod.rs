//! Sort specification for list results
//!
//! A [`SortSpec`] names one key and a direction. It expands into a
//! [`SortOrder`], the ordered descriptor list handed to storage, which carries
//! the key's own tie-breaker so results never depend on storage defaults.

pub mod keys;

#[cfg(test)]
mod tests;

use mediashelf_model::{MediaRecord, ModelError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub use keys::{OptionalKey, TitleKey, compare_by, progress_of};

/// Keys a list can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Title,
    ReleaseDate,
    Rating,
    WatchState,
    DateAdded,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Title,
        SortKey::ReleaseDate,
        SortKey::Rating,
        SortKey::WatchState,
        SortKey::DateAdded,
    ];

    /// Stable identifier used in persisted preferences
    pub fn id(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::ReleaseDate => "release_date",
            SortKey::Rating => "rating",
            SortKey::WatchState => "watch_state",
            SortKey::DateAdded => "date_added",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Title => "Title",
            SortKey::ReleaseDate => "Release Date",
            SortKey::Rating => "Rating",
            SortKey::WatchState => "Watch Progress",
            SortKey::DateAdded => "Date Added",
        }
    }

    /// Direction used when no preference was stored
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortKey::Title => SortDirection::Ascending,
            SortKey::ReleaseDate
            | SortKey::Rating
            | SortKey::WatchState
            | SortKey::DateAdded => SortDirection::Descending,
        }
    }

    /// Secondary key applied when two records tie on this one
    pub fn tie_breaker(&self) -> SortDescriptor {
        match self {
            SortKey::Title => SortDescriptor::new(SortKey::ReleaseDate, SortDirection::Descending),
            _ => SortDescriptor::new(SortKey::Title, SortDirection::Ascending),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SortKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.id() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "sort key",
                value: s.to_string(),
            })
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, SortDirection::Descending)
    }

    /// Orient an ascending comparison result
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// A key together with the direction it is applied in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// User-facing sort choice: one key and a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Sort by `key` in its default direction
    pub fn new(key: SortKey) -> Self {
        Self {
            key,
            direction: key.default_direction(),
        }
    }

    pub fn with_direction(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Expand into primary key plus the key's tie-breaker
    pub fn to_order(&self) -> SortOrder {
        SortOrder(vec![
            SortDescriptor::new(self.key, self.direction),
            self.key.tie_breaker(),
        ])
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec::new(SortKey::Title)
    }
}

impl From<SortSpec> for SortOrder {
    fn from(spec: SortSpec) -> Self {
        spec.to_order()
    }
}

/// Ordered sort descriptors handed to storage.
///
/// Records equal on every descriptor are ordered by id so the result is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder(pub Vec<SortDescriptor>);

impl SortOrder {
    pub fn descriptors(&self) -> &[SortDescriptor] {
        &self.0
    }

    pub fn primary(&self) -> Option<SortDescriptor> {
        self.0.first().copied()
    }

    pub fn compare(&self, a: &MediaRecord, b: &MediaRecord) -> Ordering {
        self.0
            .iter()
            .map(|descriptor| compare_by(a, b, descriptor.key, descriptor.direction))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }

    /// Stable in-place sort
    pub fn sort(&self, records: &mut [MediaRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortSpec::default().to_order()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, descriptor) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", descriptor.key, descriptor.direction.as_sql())?;
        }
        Ok(())
    }
}
