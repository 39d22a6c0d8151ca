//! Sparse, user-editable filter criteria.

use super::types::{ScalarRange, lenient_range};
use mediashelf_model::{GenreId, MediaStatus, MediaType, ShowType, StarRating, TagId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Optional filter conditions over a media collection.
///
/// An absent scalar or an empty set means "no constraint". The struct has no
/// internal synchronisation; a single owner is expected to serialise writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub is_adult: Option<bool>,
    pub media_type: Option<MediaType>,
    #[serde(deserialize_with = "lenient_range")]
    pub rating: Option<ScalarRange<StarRating>>,
    /// Inclusive release (or first air) years.
    #[serde(deserialize_with = "lenient_range")]
    pub year: Option<ScalarRange<i32>>,
    /// Only applies to shows.
    #[serde(deserialize_with = "lenient_range")]
    pub season_count: Option<ScalarRange<u32>>,
    /// For movies this compares the watched flag. For shows it asks whether
    /// the recorded progress covers every available season, and the show's
    /// own `watched` flag is not consulted.
    pub watched: Option<bool>,
    pub watch_again: Option<bool>,
    pub genres: BTreeSet<GenreId>,
    pub statuses: BTreeSet<MediaStatus>,
    /// Only applies to shows.
    pub show_types: BTreeSet<ShowType>,
    pub tags: BTreeSet<TagId>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field constrains anything.
    pub fn is_reset(&self) -> bool {
        self.is_adult.is_none()
            && self.media_type.is_none()
            && self.rating.is_none()
            && self.year.is_none()
            && self.season_count.is_none()
            && self.watched.is_none()
            && self.watch_again.is_none()
            && self.genres.is_empty()
            && self.statuses.is_empty()
            && self.show_types.is_empty()
            && self.tags.is_empty()
    }

    /// Clears every field.
    pub fn reset(&mut self) {
        let Self {
            is_adult,
            media_type,
            rating,
            year,
            season_count,
            watched,
            watch_again,
            genres,
            statuses,
            show_types,
            tags,
        } = self;
        *is_adult = None;
        *media_type = None;
        *rating = None;
        *year = None;
        *season_count = None;
        *watched = None;
        *watch_again = None;
        genres.clear();
        statuses.clear();
        show_types.clear();
        tags.clear();
        debug_assert!(self.is_reset());
    }

    /// Number of fields that currently constrain the result.
    pub fn active_count(&self) -> usize {
        [
            self.is_adult.is_some(),
            self.media_type.is_some(),
            self.rating.is_some(),
            self.year.is_some(),
            self.season_count.is_some(),
            self.watched.is_some(),
            self.watch_again.is_some(),
            !self.genres.is_empty(),
            !self.statuses.is_empty(),
            !self.show_types.is_empty(),
            !self.tags.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Whether any constraint can only be decided after fetching.
    pub fn needs_post_fetch(&self) -> bool {
        self.watched.is_some() && self.media_type != Some(MediaType::Movie)
    }

    /// Stable hash of every field, used to notice that compiled predicates
    /// derived from an earlier state are stale.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}
