//! Postgres rendering of compiled expressions and sort orders.
//!
//! Every literal is bound as a parameter. The rendered SQL follows the
//! evaluation rules of [`CompiledExpr::matches`]: array columns hold the
//! multi-valued fields, `IS NULL` on an array means empty, and a NULL column
//! never satisfies a comparison.

use crate::error::{Result, ShelfError};
use crate::query::{CompiledExpr, Field, SortKey, SortOrder, Value};
use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};
use std::collections::BTreeSet;
use tracing::debug;
use uuid::Uuid;

pub const MEDIA_TABLE: &str = "media";

/// Column backing a field.
pub fn column(field: Field) -> &'static str {
    match field {
        Field::Id => "id",
        Field::MediaType => "media_type",
        Field::IsAdult => "is_adult",
        Field::Genres => "genre_ids",
        Field::PersonalRating => "personal_rating",
        Field::ReleaseDate => "release_date",
        Field::Status => "status",
        Field::ShowType => "show_type",
        Field::SeasonCount => "season_count",
        Field::Watched => "watched",
        Field::WatchAgain => "watch_again",
        Field::LastSeasonWatched => "last_season_watched",
        Field::LastEpisodeWatched => "last_episode_watched",
        Field::Tags => "tag_ids",
        Field::IsFavorite => "is_favorite",
        Field::IsOnWatchlist => "is_on_watchlist",
    }
}

/// Appends `expr` as a boolean SQL expression.
pub fn push_where<'args>(qb: &mut QueryBuilder<'args, Postgres>, expr: &CompiledExpr) -> Result<()> {
    match expr {
        CompiledExpr::Eq { field, value } if value.is_null() => {
            if field.is_multi_valued() {
                qb.push("COALESCE(cardinality(");
                qb.push(column(*field));
                qb.push("), 0) = 0");
            } else {
                qb.push(column(*field));
                qb.push(" IS NULL");
            }
        }
        CompiledExpr::Eq { field, value } => {
            if field.is_multi_valued() {
                push_value(qb, value)?;
                qb.push(" = ANY(");
                qb.push(column(*field));
                qb.push(")");
            } else {
                qb.push(column(*field));
                qb.push(" = ");
                push_value(qb, value)?;
            }
        }
        CompiledExpr::InSet { values, .. } if values.is_empty() => {
            qb.push("FALSE");
        }
        CompiledExpr::InSet { field, values } => {
            qb.push(column(*field));
            if field.is_multi_valued() {
                qb.push(" && ");
                push_array(qb, values)?;
            } else {
                qb.push(" = ANY(");
                push_array(qb, values)?;
                qb.push(")");
            }
        }
        CompiledExpr::Range {
            field,
            lower,
            upper,
            lower_inclusive,
            upper_inclusive,
        } => {
            let operand = if field.is_multi_valued() {
                qb.push("EXISTS (SELECT 1 FROM UNNEST(");
                qb.push(column(*field));
                qb.push(") AS elem WHERE ");
                "elem"
            } else {
                qb.push("(");
                column(*field)
            };
            match (lower, upper) {
                (None, None) => {
                    qb.push(operand);
                    qb.push(" IS NOT NULL");
                }
                _ => {
                    let mut first = true;
                    if let Some(lower) = lower {
                        qb.push(operand);
                        qb.push(if *lower_inclusive { " >= " } else { " > " });
                        push_value(qb, lower)?;
                        first = false;
                    }
                    if let Some(upper) = upper {
                        if !first {
                            qb.push(" AND ");
                        }
                        qb.push(operand);
                        qb.push(if *upper_inclusive { " <= " } else { " < " });
                        push_value(qb, upper)?;
                    }
                }
            }
            qb.push(")");
        }
        CompiledExpr::And { exprs } => push_joined(qb, exprs, " AND ")?,
        CompiledExpr::Or { exprs } => push_joined(qb, exprs, " OR ")?,
        CompiledExpr::Always { value } => {
            qb.push(if *value { "TRUE" } else { "FALSE" });
        }
    }
    Ok(())
}

fn push_joined<'args>(
    qb: &mut QueryBuilder<'args, Postgres>,
    exprs: &[CompiledExpr],
    separator: &str,
) -> Result<()> {
    qb.push("(");
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            qb.push(separator);
        }
        push_where(qb, expr)?;
    }
    qb.push(")");
    Ok(())
}

fn push_value<'args>(qb: &mut QueryBuilder<'args, Postgres>, value: &Value) -> Result<()> {
    match value {
        Value::Null => {
            return Err(ShelfError::InvalidQuery(
                "null literal outside an IS NULL check".to_string(),
            ));
        }
        Value::Bool(v) => {
            qb.push_bind(*v);
        }
        Value::Int(v) => {
            qb.push_bind(*v);
        }
        Value::Date(v) => {
            qb.push_bind(*v);
        }
        Value::Text(v) => {
            qb.push_bind(v.clone());
        }
        Value::Uuid(v) => {
            qb.push_bind(*v);
        }
    }
    Ok(())
}

/// Binds a homogeneous set as a single array parameter.
fn push_array<'args>(qb: &mut QueryBuilder<'args, Postgres>, values: &BTreeSet<Value>) -> Result<()> {
    fn collect<T>(values: &BTreeSet<Value>, pick: impl Fn(&Value) -> Option<T>) -> Result<Vec<T>> {
        values
            .iter()
            .map(|value| {
                pick(value).ok_or_else(|| {
                    ShelfError::InvalidQuery(format!("mixed literal kinds in set near {value}"))
                })
            })
            .collect()
    }

    let Some(first) = values.first() else {
        return Err(ShelfError::InvalidQuery("empty set literal".to_string()));
    };
    match first {
        Value::Null => {
            return Err(ShelfError::InvalidQuery("null inside a set literal".to_string()));
        }
        Value::Bool(_) => {
            let items: Vec<bool> = collect(values, |v| match v {
                Value::Bool(b) => Some(*b),
                _ => None,
            })?;
            qb.push_bind(items);
        }
        Value::Int(_) => {
            let items: Vec<i64> = collect(values, |v| match v {
                Value::Int(i) => Some(*i),
                _ => None,
            })?;
            qb.push_bind(items);
        }
        Value::Date(_) => {
            let items: Vec<NaiveDate> = collect(values, |v| match v {
                Value::Date(d) => Some(*d),
                _ => None,
            })?;
            qb.push_bind(items);
        }
        Value::Text(_) => {
            let items: Vec<String> = collect(values, |v| match v {
                Value::Text(s) => Some(s.clone()),
                _ => None,
            })?;
            qb.push_bind(items);
        }
        Value::Uuid(_) => {
            let items: Vec<Uuid> = collect(values, |v| match v {
                Value::Uuid(u) => Some(*u),
                _ => None,
            })?;
            qb.push_bind(items);
        }
    }
    Ok(())
}

// Watch progress orders by season, then episode, where a whole season ranks
// after all of its episodes. Movies rank as season 1 when watched and as
// nothing watched otherwise.
const WATCH_SEASON_SQL: &str = "CASE WHEN media_type = 'movie' THEN watched::INT4::INT8 \
     WHEN last_season_watched > 0 THEN last_season_watched \
     WHEN last_season_watched IS NOT NULL THEN 0 END";
const WATCH_EPISODE_SQL: &str = "CASE WHEN media_type = 'movie' THEN \
     (CASE WHEN watched THEN 9223372036854775807 ELSE 0 END) \
     WHEN last_season_watched > 0 THEN \
     COALESCE(NULLIF(GREATEST(last_episode_watched, 0), 0), 9223372036854775807) \
     ELSE 0 END";

fn sort_expressions(key: SortKey) -> &'static [&'static str] {
    match key {
        SortKey::Title => &["LOWER(BTRIM(title))"],
        SortKey::ReleaseDate => &["release_date"],
        SortKey::Rating => &["personal_rating"],
        SortKey::WatchState => &[WATCH_SEASON_SQL, WATCH_EPISODE_SQL],
        SortKey::DateAdded => &["created_at"],
    }
}

/// Appends ` ORDER BY ...` for `order`, ending with the id tie-break.
pub fn push_order_by<'args>(qb: &mut QueryBuilder<'args, Postgres>, order: &SortOrder) {
    qb.push(" ORDER BY ");
    for descriptor in order.descriptors() {
        for sql in sort_expressions(descriptor.key) {
            qb.push(*sql);
            qb.push(" ");
            qb.push(descriptor.direction.as_sql());
            qb.push(" NULLS LAST, ");
        }
    }
    qb.push("id ASC");
}

/// Full `SELECT` over the media table.
pub fn select_media(expr: &CompiledExpr, order: &SortOrder) -> Result<QueryBuilder<'static, Postgres>> {
    let mut qb = QueryBuilder::new("SELECT * FROM ");
    qb.push(MEDIA_TABLE);
    qb.push(" WHERE ");
    push_where(&mut qb, expr)?;
    push_order_by(&mut qb, order);
    debug!(sql = qb.sql(), "rendered media query");
    Ok(qb)
}
