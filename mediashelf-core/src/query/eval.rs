//! In-memory evaluation of [`CompiledExpr`] against a [`MediaRecord`].
//!
//! This is the reference semantics every storage backend has to match.

use super::expr::{CompiledExpr, Field, Value};
use mediashelf_model::MediaRecord;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A record attribute as seen by the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Single value; `Value::Null` when the record does not know it.
    Scalar(Value),
    Set(BTreeSet<Value>),
}

pub fn field_value(record: &MediaRecord, field: Field) -> FieldValue {
    use FieldValue::{Scalar, Set};
    match field {
        Field::Id => Scalar(record.id.into()),
        Field::MediaType => Scalar(record.media_type.into()),
        Field::IsAdult => Scalar(record.is_adult.into()),
        Field::Genres => Set(record.genres.iter().copied().map(Value::from).collect()),
        Field::PersonalRating => Scalar(record.personal_rating.into()),
        Field::ReleaseDate => Scalar(record.release_date.into()),
        Field::Status => Scalar(record.status.into()),
        Field::ShowType => Scalar(record.show_type.into()),
        Field::SeasonCount => Scalar(record.season_count.into()),
        Field::Watched => Scalar(record.watched.into()),
        Field::WatchAgain => Scalar(record.watch_again.into()),
        Field::LastSeasonWatched => Scalar(record.last_season_watched.into()),
        Field::LastEpisodeWatched => Scalar(record.last_episode_watched.into()),
        Field::Tags => Set(record.tags.iter().copied().map(Value::from).collect()),
        Field::IsFavorite => Scalar(record.is_favorite.into()),
        Field::IsOnWatchlist => Scalar(record.is_on_watchlist.into()),
    }
}

impl CompiledExpr {
    /// Evaluates the expression against a single record.
    pub fn matches(&self, record: &MediaRecord) -> bool {
        match self {
            CompiledExpr::Eq { field, value } => match field_value(record, *field) {
                FieldValue::Scalar(actual) => &actual == value,
                FieldValue::Set(actual) if value.is_null() => actual.is_empty(),
                FieldValue::Set(actual) => actual.contains(value),
            },
            CompiledExpr::InSet { field, values } => match field_value(record, *field) {
                FieldValue::Scalar(actual) => values.contains(&actual),
                FieldValue::Set(actual) => !actual.is_disjoint(values),
            },
            CompiledExpr::Range {
                field,
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
            } => {
                let in_range = |actual: &Value| {
                    within(
                        actual,
                        lower.as_ref(),
                        upper.as_ref(),
                        *lower_inclusive,
                        *upper_inclusive,
                    )
                };
                match field_value(record, *field) {
                    FieldValue::Scalar(actual) => in_range(&actual),
                    FieldValue::Set(actual) => actual.iter().any(in_range),
                }
            }
            CompiledExpr::And { exprs } => exprs.iter().all(|expr| expr.matches(record)),
            CompiledExpr::Or { exprs } => exprs.iter().any(|expr| expr.matches(record)),
            CompiledExpr::Always { value } => *value,
        }
    }
}

fn within(
    actual: &Value,
    lower: Option<&Value>,
    upper: Option<&Value>,
    lower_inclusive: bool,
    upper_inclusive: bool,
) -> bool {
    if actual.is_null() {
        return false;
    }
    let lower_ok = match lower {
        None => true,
        Some(bound) => match actual.compare(bound) {
            Some(Ordering::Greater) => true,
            Some(Ordering::Equal) => lower_inclusive,
            _ => false,
        },
    };
    let upper_ok = match upper {
        None => true,
        Some(bound) => match actual.compare(bound) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => upper_inclusive,
            _ => false,
        },
    };
    lower_ok && upper_ok
}
