//! Missing-information classification.
//!
//! A record lands on the Problems list when user metadata the library relies
//! on is unknown. [`missing_information`] is the per-record classifier and
//! [`problems_predicate`] is the same rule set as a [`CompiledExpr`], so the
//! list can be fetched from any storage backend.

use crate::config::ProblemsConfig;
use crate::query::{CompiledExpr, Field};
use mediashelf_model::{MediaRecord, MediaType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingInfo {
    /// Movie whose watched flag is unknown.
    WatchedFlag,
    /// Show whose watch state is unknown or failed to decode.
    WatchProgress,
    /// Watched (or started) but not rated.
    PersonalRating,
    /// Watched movie without a watch-again answer.
    WatchAgain,
}

impl MissingInfo {
    pub fn label(&self) -> &'static str {
        match self {
            MissingInfo::WatchedFlag => "Watched status",
            MissingInfo::WatchProgress => "Watch progress",
            MissingInfo::PersonalRating => "Personal rating",
            MissingInfo::WatchAgain => "Watch again",
        }
    }
}

impl fmt::Display for MissingInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the record is missing under the given rules.
pub fn missing_information(record: &MediaRecord, config: &ProblemsConfig) -> BTreeSet<MissingInfo> {
    let mut missing = BTreeSet::new();

    match record.media_type {
        MediaType::Movie if record.watched.is_none() => {
            missing.insert(MissingInfo::WatchedFlag);
        }
        MediaType::Show if record.watch_state().is_none() => {
            missing.insert(MissingInfo::WatchProgress);
        }
        _ => {}
    }

    if config.require_rating
        && record.has_progress() == Some(true)
        && record.personal_rating.is_none()
    {
        missing.insert(MissingInfo::PersonalRating);
    }

    if config.require_watch_again
        && record.is_movie()
        && record.watched == Some(true)
        && record.watch_again.is_none()
    {
        missing.insert(MissingInfo::WatchAgain);
    }

    missing
}

pub fn has_problems(record: &MediaRecord, config: &ProblemsConfig) -> bool {
    !missing_information(record, config).is_empty()
}

/// Declarative form of [`has_problems`].
pub fn problems_predicate(config: &ProblemsConfig) -> CompiledExpr {
    let is_movie = || CompiledExpr::eq(Field::MediaType, MediaType::Movie);
    let is_show = || CompiledExpr::eq(Field::MediaType, MediaType::Show);
    let watched_movie = || CompiledExpr::and([is_movie(), CompiledExpr::eq(Field::Watched, true)]);

    let mut rules = vec![
        CompiledExpr::and([is_movie(), CompiledExpr::is_null(Field::Watched)]),
        CompiledExpr::and([is_show(), CompiledExpr::is_null(Field::LastSeasonWatched)]),
    ];

    if config.require_rating {
        rules.push(CompiledExpr::and([
            CompiledExpr::is_null(Field::PersonalRating),
            CompiledExpr::or([
                watched_movie(),
                CompiledExpr::and([
                    is_show(),
                    CompiledExpr::at_least(Field::LastSeasonWatched, 1i64),
                ]),
            ]),
        ]));
    }

    if config.require_watch_again {
        rules.push(CompiledExpr::and([
            watched_movie(),
            CompiledExpr::is_null(Field::WatchAgain),
        ]));
    }

    CompiledExpr::or(rules)
}
