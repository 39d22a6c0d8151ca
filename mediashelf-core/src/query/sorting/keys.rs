//! Sort key values extracted from media records
//!
//! Every key wraps an optional value and keeps missing data at the end of
//! the list regardless of direction.

use super::{SortDirection, SortKey};
use mediashelf_model::{MediaRecord, MediaType, WatchState};
use std::cmp::Ordering;

/// Optional value where missing entries always sort last
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionalKey<T>(Option<T>);

impl<T: Ord> OptionalKey<T> {
    pub fn new(value: Option<T>) -> Self {
        OptionalKey(value)
    }

    pub fn missing() -> Self {
        OptionalKey(None)
    }

    pub fn is_missing(&self) -> bool {
        self.0.is_none()
    }

    /// Compare two keys in the given direction, missing values last
    pub fn compare_with_order(&self, other: &Self, direction: SortDirection) -> Ordering {
        match (&self.0, &other.0) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => direction.apply(a.cmp(b)),
        }
    }
}

/// Case-insensitive title; titles differing only in case tie
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TitleKey(String);

impl TitleKey {
    pub fn new(title: &str) -> Self {
        TitleKey(title.trim().to_lowercase())
    }
}

/// Watch progress as a sortable value.
///
/// Shows use their derived watch state. A movie is a single unit, so a
/// watched movie ranks like a finished first season and an unwatched one like
/// `NotWatched`.
pub fn progress_of(record: &MediaRecord) -> Option<WatchState> {
    match record.media_type {
        MediaType::Show => record.watch_state(),
        MediaType::Movie => record
            .watched
            .map(|watched| WatchState::construct(i64::from(watched), None)),
    }
}

/// Compare two records on a single key
pub fn compare_by(a: &MediaRecord, b: &MediaRecord, key: SortKey, direction: SortDirection) -> Ordering {
    match key {
        SortKey::Title => {
            let left = OptionalKey::new(Some(TitleKey::new(&a.title)));
            left.compare_with_order(&OptionalKey::new(Some(TitleKey::new(&b.title))), direction)
        }
        SortKey::ReleaseDate => {
            OptionalKey::new(a.release_date).compare_with_order(&OptionalKey::new(b.release_date), direction)
        }
        SortKey::Rating => OptionalKey::new(a.personal_rating)
            .compare_with_order(&OptionalKey::new(b.personal_rating), direction),
        SortKey::WatchState => OptionalKey::new(progress_of(a))
            .compare_with_order(&OptionalKey::new(progress_of(b)), direction),
        SortKey::DateAdded => {
            OptionalKey::new(Some(a.created_at)).compare_with_order(&OptionalKey::new(Some(b.created_at)), direction)
        }
    }
}
