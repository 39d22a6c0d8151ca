//! Translation of [`FilterCriteria`] into a storage-ready predicate.
//!
//! Compilation is two-phase. Everything a storage backend can evaluate per
//! record goes into the declarative [`CompiledExpr`]. Conditions that need an
//! aggregate over a record's seasons (for example "has the user seen every
//! season that already aired") are over-approximated in the expression and
//! refined afterwards by an in-memory [`PostFetchFilter`].

use super::criteria::FilterCriteria;
use super::expr::{CompiledExpr, Field};
use crate::config::ShelfConfig;
use chrono::{Datelike, NaiveDate};
use mediashelf_model::{MediaRecord, MediaType, SeasonAvailability};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// In-memory refinement applied to the storage result.
pub type PostFetchFilter = Arc<dyn Fn(&MediaRecord) -> bool + Send + Sync>;

/// Output of the compiler: a declarative predicate plus an optional refinement.
///
/// `expr` matches a superset of the true result; `post_fetch` removes the
/// false positives and never adds records.
#[derive(Clone)]
pub struct CompiledFilter {
    pub expr: CompiledExpr,
    pub post_fetch: Option<PostFetchFilter>,
}

impl CompiledFilter {
    pub fn declarative(expr: CompiledExpr) -> Self {
        Self {
            expr,
            post_fetch: None,
        }
    }

    pub fn matches(&self, record: &MediaRecord) -> bool {
        self.expr.matches(record) && self.passes_post_fetch(record)
    }

    pub fn passes_post_fetch(&self, record: &MediaRecord) -> bool {
        self.post_fetch.as_ref().is_none_or(|filter| filter(record))
    }

    /// Drops the records rejected by the post-fetch filter, keeping the
    /// storage order of the survivors.
    pub fn refine(&self, mut records: Vec<MediaRecord>) -> Vec<MediaRecord> {
        if let Some(filter) = &self.post_fetch {
            let before = records.len();
            records.retain(|record| filter(record));
            trace!(before, after = records.len(), "applied post-fetch filter");
        }
        records
    }
}

impl fmt::Debug for CompiledFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFilter")
            .field("expr", &self.expr)
            .field("post_fetch", &self.post_fetch.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Compiles criteria against a fixed "today" and season policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateCompiler {
    today: NaiveDate,
    seasons: SeasonAvailability,
}

impl PredicateCompiler {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            seasons: SeasonAvailability::default(),
        }
    }

    pub fn with_config(today: NaiveDate, config: &ShelfConfig) -> Self {
        Self {
            today,
            seasons: config.seasons.availability(),
        }
    }

    pub fn with_season_availability(mut self, seasons: SeasonAvailability) -> Self {
        self.seasons = seasons;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn compile(&self, criteria: &FilterCriteria) -> CompiledFilter {
        let mut clauses = Vec::new();
        let mut refinements: Vec<PostFetchFilter> = Vec::new();

        if let Some(is_adult) = criteria.is_adult {
            clauses.push(CompiledExpr::eq(Field::IsAdult, is_adult));
        }

        if let Some(media_type) = criteria.media_type {
            clauses.push(CompiledExpr::eq(Field::MediaType, media_type));
        }

        if let Some(range) = criteria.rating {
            clauses.push(CompiledExpr::between(Field::PersonalRating, range.min, range.max));
        }

        if let Some(range) = criteria.year {
            clauses.push(year_clause(range.min, range.max));
        }

        if let Some(range) = criteria.season_count {
            clauses.push(show_only(CompiledExpr::between(
                Field::SeasonCount,
                range.min,
                range.max,
            )));
        }

        if let Some(watched) = criteria.watched {
            let (clause, refinement) = self.watched_clause(watched, criteria.media_type);
            clauses.push(clause);
            refinements.extend(refinement);
        }

        if let Some(watch_again) = criteria.watch_again {
            clauses.push(CompiledExpr::eq(Field::WatchAgain, watch_again));
        }

        if !criteria.genres.is_empty() {
            clauses.push(CompiledExpr::in_set(Field::Genres, criteria.genres.iter().copied()));
        }

        if !criteria.statuses.is_empty() {
            clauses.push(CompiledExpr::in_set(Field::Status, criteria.statuses.iter().copied()));
        }

        if !criteria.show_types.is_empty() {
            clauses.push(show_only(CompiledExpr::in_set(
                Field::ShowType,
                criteria.show_types.iter().copied(),
            )));
        }

        if !criteria.tags.is_empty() {
            clauses.push(CompiledExpr::in_set(Field::Tags, criteria.tags.iter().copied()));
        }

        let filter = CompiledFilter {
            expr: CompiledExpr::and(clauses),
            post_fetch: combine(refinements),
        };
        debug!(
            expr = %filter.expr,
            post_fetch = filter.post_fetch.is_some(),
            "compiled filter criteria"
        );
        filter
    }

    /// Movies carry a plain `watched` flag. For shows the answer depends on the
    /// highest season already available, so every show passes the declarative
    /// stage and the caught-up check runs after the fetch.
    fn watched_clause(
        &self,
        watched: bool,
        media_type: Option<MediaType>,
    ) -> (CompiledExpr, Option<PostFetchFilter>) {
        let movie_clause = CompiledExpr::eq(Field::Watched, watched);
        if media_type == Some(MediaType::Movie) {
            return (movie_clause, None);
        }

        let clause = CompiledExpr::or([
            CompiledExpr::and([CompiledExpr::eq(Field::MediaType, MediaType::Movie), movie_clause]),
            CompiledExpr::eq(Field::MediaType, MediaType::Show),
        ]);

        let today = self.today;
        let seasons = self.seasons;
        let refinement: PostFetchFilter = Arc::new(move |record: &MediaRecord| {
            if !record.is_show() {
                return true;
            }
            record.is_caught_up(today, seasons) == Some(watched)
        });
        (clause, Some(refinement))
    }
}

/// Year ranges compare against a date. The lower bound is inclusive at the
/// first day of `min`; the upper bound is exclusive at the first day of
/// `max + 1` so the whole final year is included. A bound outside the
/// representable calendar leaves that side open.
fn year_clause(min: i32, max: i32) -> CompiledExpr {
    let lower = year_start(min);
    let upper = max.checked_add(1).and_then(year_start);
    CompiledExpr::Range {
        field: Field::ReleaseDate,
        lower: lower.map(Into::into),
        upper: upper.map(Into::into),
        lower_inclusive: true,
        upper_inclusive: false,
    }
}

fn year_start(year: i32) -> Option<NaiveDate> {
    if year < NaiveDate::MIN.year() || year > NaiveDate::MAX.year() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Wraps a show-only clause so it never excludes movies.
fn show_only(clause: CompiledExpr) -> CompiledExpr {
    CompiledExpr::or([
        CompiledExpr::eq(Field::MediaType, MediaType::Movie),
        CompiledExpr::and([CompiledExpr::eq(Field::MediaType, MediaType::Show), clause]),
    ])
}

fn combine(mut filters: Vec<PostFetchFilter>) -> Option<PostFetchFilter> {
    match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(Arc::new(move |record: &MediaRecord| {
            filters.iter().all(|filter| filter(record))
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::ScalarRange;
    use mediashelf_model::{GenreId, SeasonInfo, ShowType, StarRating, WatchState};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn compiler() -> PredicateCompiler {
        PredicateCompiler::new(date(2024, 6, 1))
    }

    #[test]
    fn empty_criteria_compiles_to_true() {
        let filter = compiler().compile(&FilterCriteria::new());
        assert_eq!(filter.expr, CompiledExpr::TRUE);
        assert!(filter.post_fetch.is_none());
    }

    #[test]
    fn clauses_follow_declaration_order() {
        let criteria = FilterCriteria {
            genres: [GenreId(28)].into_iter().collect(),
            watch_again: Some(true),
            is_adult: Some(false),
            ..FilterCriteria::default()
        };
        let filter = compiler().compile(&criteria);
        assert_eq!(
            filter.expr,
            CompiledExpr::And {
                exprs: vec![
                    CompiledExpr::eq(Field::IsAdult, false),
                    CompiledExpr::eq(Field::WatchAgain, true),
                    CompiledExpr::in_set(Field::Genres, [GenreId(28)]),
                ]
            }
        );
        assert_eq!(filter.expr, compiler().compile(&criteria).expr);
    }

    #[test]
    fn year_upper_bound_is_exclusive_next_year() {
        let criteria = FilterCriteria {
            year: Some(ScalarRange::new(2020, 2020)),
            ..FilterCriteria::default()
        };
        let filter = compiler().compile(&criteria);
        assert_eq!(
            filter.expr,
            CompiledExpr::half_open(Field::ReleaseDate, date(2020, 1, 1), date(2021, 1, 1))
        );

        let mut movie = MediaRecord::movie("Soul");
        movie.release_date = Some(date(2020, 12, 31));
        assert!(filter.matches(&movie));
        movie.release_date = Some(date(2021, 1, 1));
        assert!(!filter.matches(&movie));
        movie.release_date = Some(date(2020, 1, 1));
        assert!(filter.matches(&movie));
    }

    #[test]
    fn extreme_years_leave_the_range_open() {
        let criteria = FilterCriteria {
            year: Some(ScalarRange::new(i32::MIN, i32::MAX)),
            ..FilterCriteria::default()
        };
        let filter = compiler().compile(&criteria);
        let CompiledExpr::Range { lower, upper, .. } = &filter.expr else {
            panic!("expected a range, got {}", filter.expr);
        };
        assert!(lower.is_none());
        assert!(upper.is_none());
    }

    #[test]
    fn show_only_fields_keep_movies() {
        let criteria = FilterCriteria {
            show_types: [ShowType::Documentary].into_iter().collect(),
            season_count: Some(ScalarRange::new(1, 2)),
            ..FilterCriteria::default()
        };
        let filter = compiler().compile(&criteria);

        assert!(filter.matches(&MediaRecord::movie("Amélie")));

        let mut doc = MediaRecord::show("Planet Earth");
        doc.show_type = Some(ShowType::Documentary);
        doc.season_count = Some(2);
        assert!(filter.matches(&doc));

        let mut scripted = doc.clone();
        scripted.show_type = Some(ShowType::Scripted);
        assert!(!filter.matches(&scripted));

        let mut long_doc = doc.clone();
        long_doc.season_count = Some(4);
        assert!(!filter.matches(&long_doc));
    }

    #[test]
    fn rating_range_is_inclusive() {
        let criteria = FilterCriteria {
            rating: Some(ScalarRange::new(StarRating::stars(4), StarRating::stars(5))),
            ..FilterCriteria::default()
        };
        let filter = compiler().compile(&criteria);
        let mut movie = MediaRecord::movie("Drive");
        for (half_stars, expected) in [(7, false), (8, true), (10, true)] {
            movie.personal_rating = Some(StarRating::from_half_stars(half_stars).unwrap());
            assert_eq!(filter.matches(&movie), expected, "{half_stars}");
        }
        movie.personal_rating = None;
        assert!(!filter.matches(&movie));
    }

    #[test]
    fn watched_for_movies_only_stays_declarative() {
        let criteria = FilterCriteria {
            media_type: Some(MediaType::Movie),
            watched: Some(true),
            ..FilterCriteria::default()
        };
        let filter = compiler().compile(&criteria);
        assert!(filter.post_fetch.is_none());
        assert!(!criteria.needs_post_fetch());
    }

    #[test]
    fn watched_for_shows_is_refined_after_fetch() {
        let criteria = FilterCriteria {
            watched: Some(false),
            ..FilterCriteria::default()
        };
        assert!(criteria.needs_post_fetch());
        let filter = compiler().compile(&criteria);
        assert!(filter.post_fetch.is_some());

        let mut show = MediaRecord::show("Andor");
        show.seasons = vec![
            SeasonInfo::new(1, 12, Some(date(2022, 9, 21))),
            SeasonInfo::new(2, 12, Some(date(2025, 4, 22))),
        ];
        show.set_watch_state(Some(WatchState::construct(1, None)));

        // Season two has not aired yet on 2024-06-01, so the show is caught up.
        assert!(filter.expr.matches(&show));
        assert!(!filter.matches(&show));

        let later = PredicateCompiler::new(date(2025, 6, 1)).compile(&criteria);
        assert!(later.matches(&show));

        let mut unwatched_movie = MediaRecord::movie("Rogue One");
        unwatched_movie.watched = Some(false);
        assert!(filter.matches(&unwatched_movie));
        unwatched_movie.watched = Some(true);
        assert!(!filter.matches(&unwatched_movie));
    }

    #[test]
    fn refine_preserves_order_and_never_adds() {
        let criteria = FilterCriteria {
            watched: Some(true),
            ..FilterCriteria::default()
        };
        let filter = compiler().compile(&criteria);

        let mut seen = MediaRecord::show("Dark");
        seen.seasons = vec![SeasonInfo::new(1, 10, Some(date(2017, 12, 1)))];
        seen.set_watch_state(Some(WatchState::construct(1, None)));
        let mut unseen = seen.clone();
        unseen.title = "Dark (rewatch)".into();
        unseen.set_watch_state(Some(WatchState::NotWatched));
        let mut movie = MediaRecord::movie("Arrival");
        movie.watched = Some(true);

        let input = vec![movie.clone(), unseen, seen.clone()];
        let refined = filter.refine(input.clone());
        assert_eq!(refined, vec![movie, seen]);
        assert!(refined.iter().all(|r| input.contains(r)));
    }
}
