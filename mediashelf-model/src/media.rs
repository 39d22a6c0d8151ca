use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::filter_types::{MediaStatus, ShowType};
use crate::ids::{GenreId, MediaId, TagId};
use crate::media_type::MediaType;
use crate::numbers::StarRating;
use crate::watch::WatchState;

/// Per-season metadata needed to decide what is available to watch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeasonInfo {
    /// Season number; 0 holds specials and never counts as a regular season.
    pub number: u32,
    pub episode_count: u32,
    pub air_date: Option<NaiveDate>,
}

impl SeasonInfo {
    pub fn new(number: u32, episode_count: u32, air_date: Option<NaiveDate>) -> Self {
        Self {
            number,
            episode_count,
            air_date,
        }
    }

    pub fn has_aired(&self, today: NaiveDate) -> bool {
        self.air_date.is_some_and(|date| date <= today)
    }
}

/// Which seasons count as "available" when deciding whether a show is caught up.
///
/// Announced seasons without episodes and seasons that have not aired yet are
/// excluded unless explicitly allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeasonAvailability {
    pub count_unaired: bool,
    pub count_empty: bool,
}

impl SeasonAvailability {
    pub fn is_available(&self, season: &SeasonInfo, today: NaiveDate) -> bool {
        season.number >= 1
            && (self.count_empty || season.episode_count > 0)
            && (self.count_unaired || season.has_aired(today))
    }
}

/// A movie or show together with the user's metadata.
///
/// Records are owned by the storage layer; the core only reads them to
/// evaluate predicates, sort and classify.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaRecord {
    pub id: MediaId,
    pub title: String,
    pub media_type: MediaType,
    pub is_adult: bool,
    pub genres: BTreeSet<GenreId>,
    pub personal_rating: Option<StarRating>,
    /// Release date for movies, first air date for shows.
    pub release_date: Option<NaiveDate>,
    pub status: Option<MediaStatus>,
    pub show_type: Option<ShowType>,
    pub season_count: Option<u32>,
    pub seasons: Vec<SeasonInfo>,
    pub watched: Option<bool>,
    pub watch_again: Option<bool>,
    pub last_season_watched: Option<i64>,
    pub last_episode_watched: Option<i64>,
    pub tags: BTreeSet<TagId>,
    pub is_favorite: bool,
    pub is_on_watchlist: bool,
    pub created_at: DateTime<Utc>,
}

impl MediaRecord {
    pub fn new(title: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            id: MediaId::new(),
            title: title.into(),
            media_type,
            is_adult: false,
            genres: BTreeSet::new(),
            personal_rating: None,
            release_date: None,
            status: None,
            show_type: None,
            season_count: None,
            seasons: Vec::new(),
            watched: None,
            watch_again: None,
            last_season_watched: None,
            last_episode_watched: None,
            tags: BTreeSet::new(),
            is_favorite: false,
            is_on_watchlist: false,
            created_at: Utc::now(),
        }
    }

    pub fn movie(title: impl Into<String>) -> Self {
        Self::new(title, MediaType::Movie)
    }

    pub fn show(title: impl Into<String>) -> Self {
        Self::new(title, MediaType::Show)
    }

    pub fn is_movie(&self) -> bool {
        self.media_type == MediaType::Movie
    }

    pub fn is_show(&self) -> bool {
        self.media_type == MediaType::Show
    }

    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|date| date.year())
    }

    /// Derived progress view; `None` when the season field is unknown.
    pub fn watch_state(&self) -> Option<WatchState> {
        WatchState::from_fields(self.last_season_watched, self.last_episode_watched)
    }

    pub fn set_watch_state(&mut self, state: Option<WatchState>) {
        match state {
            Some(state) => {
                let (season, episode) = state.to_fields();
                self.last_season_watched = Some(season);
                self.last_episode_watched = episode;
            }
            None => {
                self.last_season_watched = None;
                self.last_episode_watched = None;
            }
        }
    }

    /// Restores progress from its persisted textual form.
    ///
    /// Text that does not decode leaves the progress unknown, which is what
    /// puts a show on the Problems list. Returns the decoded state.
    pub fn restore_watch_state(&mut self, persisted: Option<&str>) -> Option<WatchState> {
        let state = persisted.and_then(WatchState::decode);
        self.set_watch_state(state);
        state
    }

    /// Persisted textual form of the progress, if known.
    pub fn persisted_watch_state(&self) -> Option<String> {
        self.watch_state().map(|state| state.encode())
    }

    /// Highest season currently available to watch, or 0 when none is.
    pub fn max_available_season(&self, today: NaiveDate, policy: SeasonAvailability) -> u32 {
        self.seasons
            .iter()
            .filter(|season| policy.is_available(season, today))
            .map(|season| season.number)
            .max()
            .unwrap_or(0)
    }

    pub fn episode_count(&self, season_number: u32) -> u32 {
        self.seasons
            .iter()
            .find(|season| season.number == season_number)
            .map(|season| season.episode_count)
            .unwrap_or(0)
    }

    /// Whether the user has seen every available episode.
    ///
    /// Movies answer from the `watched` flag, shows compare their watch state
    /// against the highest available season. `None` means the answer depends
    /// on information the record does not have.
    pub fn is_caught_up(&self, today: NaiveDate, policy: SeasonAvailability) -> Option<bool> {
        match self.media_type {
            MediaType::Movie => self.watched,
            MediaType::Show => {
                let state = self.watch_state()?;
                let max_season = self.max_available_season(today, policy);
                Some(state.is_caught_up(max_season, |season| self.episode_count(season)))
            }
        }
    }

    /// Whether the record has any watch progress at all.
    pub fn has_progress(&self) -> Option<bool> {
        match self.media_type {
            MediaType::Movie => self.watched,
            MediaType::Show => self.watch_state().map(|state| state.has_progress()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn show_with_seasons() -> MediaRecord {
        let mut show = MediaRecord::show("Slow Horses");
        show.seasons = vec![
            SeasonInfo::new(0, 3, Some(date(2021, 1, 1))),
            SeasonInfo::new(1, 6, Some(date(2022, 4, 1))),
            SeasonInfo::new(2, 6, Some(date(2022, 12, 2))),
            SeasonInfo::new(3, 0, None),
        ];
        show
    }

    #[test]
    fn empty_and_unaired_seasons_are_not_available() {
        let show = show_with_seasons();
        let today = date(2023, 6, 1);
        assert_eq!(show.max_available_season(today, SeasonAvailability::default()), 2);

        let lenient = SeasonAvailability {
            count_unaired: true,
            count_empty: true,
        };
        assert_eq!(show.max_available_season(today, lenient), 3);
        assert_eq!(show.max_available_season(date(2022, 5, 1), SeasonAvailability::default()), 1);
    }

    #[test]
    fn caught_up_uses_derived_watch_state() {
        let mut show = show_with_seasons();
        let today = date(2023, 6, 1);
        assert_eq!(show.is_caught_up(today, SeasonAvailability::default()), None);

        show.set_watch_state(Some(WatchState::construct(2, Some(6))));
        assert_eq!(show.is_caught_up(today, SeasonAvailability::default()), Some(true));

        show.set_watch_state(Some(WatchState::construct(2, Some(5))));
        assert_eq!(show.is_caught_up(today, SeasonAvailability::default()), Some(false));

        show.set_watch_state(Some(WatchState::NotWatched));
        assert_eq!(show.has_progress(), Some(false));
    }

    #[test]
    fn movies_answer_from_watched_flag() {
        let mut movie = MediaRecord::movie("Heat");
        assert_eq!(movie.is_caught_up(date(2024, 1, 1), SeasonAvailability::default()), None);
        movie.watched = Some(true);
        assert_eq!(movie.is_caught_up(date(2024, 1, 1), SeasonAvailability::default()), Some(true));
    }

    #[test]
    fn restored_watch_state_decodes_or_becomes_unknown() {
        let mut show = show_with_seasons();
        let state = show.restore_watch_state(Some("episode,2,6"));
        assert_eq!(state, Some(WatchState::construct(2, Some(6))));
        assert_eq!(show.last_season_watched, Some(2));
        assert_eq!(show.persisted_watch_state().as_deref(), Some("episode,2,6"));

        assert_eq!(show.restore_watch_state(Some("episode,two,6")), None);
        assert_eq!(show.watch_state(), None);
        assert_eq!(show.last_episode_watched, None);
        assert_eq!(show.is_caught_up(date(2023, 6, 1), SeasonAvailability::default()), None);
    }
}
