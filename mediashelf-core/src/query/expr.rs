//! The compiled expression tree handed to storage backends.
//!
//! [`CompiledExpr`] is the wire format between the predicate compiler and any
//! storage collaborator. It serializes to tagged JSON and renders to a
//! readable infix form through `Display` for logs.

use chrono::NaiveDate;
use mediashelf_model::{GenreId, MediaId, MediaStatus, MediaType, ShowType, StarRating, TagId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Record attributes a predicate can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    MediaType,
    IsAdult,
    Genres,
    PersonalRating,
    ReleaseDate,
    Status,
    ShowType,
    SeasonCount,
    Watched,
    WatchAgain,
    LastSeasonWatched,
    LastEpisodeWatched,
    Tags,
    IsFavorite,
    IsOnWatchlist,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::MediaType => "media_type",
            Field::IsAdult => "is_adult",
            Field::Genres => "genres",
            Field::PersonalRating => "personal_rating",
            Field::ReleaseDate => "release_date",
            Field::Status => "status",
            Field::ShowType => "show_type",
            Field::SeasonCount => "season_count",
            Field::Watched => "watched",
            Field::WatchAgain => "watch_again",
            Field::LastSeasonWatched => "last_season_watched",
            Field::LastEpisodeWatched => "last_episode_watched",
            Field::Tags => "tags",
            Field::IsFavorite => "is_favorite",
            Field::IsOnWatchlist => "is_on_watchlist",
        }
    }

    /// Fields holding a set of values rather than a single scalar.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Field::Genres | Field::Tags)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A literal in a compiled expression. Enumerations travel as their stable
/// snake_case keys, ratings as half stars.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Date(NaiveDate),
    Text(String),
    Uuid(Uuid),
}

impl Value {
    /// Orders two values of the same kind; mixed kinds and nulls do not compare.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Date(value) => write!(f, "{value}"),
            Value::Text(value) => write!(f, "{value:?}"),
            Value::Uuid(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<MediaType> for Value {
    fn from(value: MediaType) -> Self {
        Value::Text(value.as_str().to_string())
    }
}

impl From<MediaStatus> for Value {
    fn from(value: MediaStatus) -> Self {
        Value::Text(value.key().to_string())
    }
}

impl From<ShowType> for Value {
    fn from(value: ShowType) -> Self {
        Value::Text(value.key().to_string())
    }
}

impl From<StarRating> for Value {
    fn from(value: StarRating) -> Self {
        Value::Int(value.half_stars() as i64)
    }
}

impl From<GenreId> for Value {
    fn from(value: GenreId) -> Self {
        Value::Int(value.value() as i64)
    }
}

impl From<TagId> for Value {
    fn from(value: TagId) -> Self {
        Value::Uuid(value.to_uuid())
    }
}

impl From<MediaId> for Value {
    fn from(value: MediaId) -> Self {
        Value::Uuid(value.to_uuid())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Declarative boolean expression over record fields.
///
/// On a multi-valued field `Eq` means "contains" and `InSet` means "shares at
/// least one element". A `Range` bound of `None` leaves that side open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CompiledExpr {
    Eq {
        field: Field,
        value: Value,
    },
    InSet {
        field: Field,
        values: BTreeSet<Value>,
    },
    Range {
        field: Field,
        lower: Option<Value>,
        upper: Option<Value>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    },
    And {
        exprs: Vec<CompiledExpr>,
    },
    Or {
        exprs: Vec<CompiledExpr>,
    },
    Always {
        value: bool,
    },
}

impl CompiledExpr {
    pub const TRUE: CompiledExpr = CompiledExpr::Always { value: true };
    pub const FALSE: CompiledExpr = CompiledExpr::Always { value: false };

    pub fn eq(field: Field, value: impl Into<Value>) -> Self {
        CompiledExpr::Eq {
            field,
            value: value.into(),
        }
    }

    pub fn is_null(field: Field) -> Self {
        CompiledExpr::Eq {
            field,
            value: Value::Null,
        }
    }

    pub fn in_set<I, V>(field: Field, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        CompiledExpr::InSet {
            field,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `lower <= field <= upper`
    pub fn between(field: Field, lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        CompiledExpr::Range {
            field,
            lower: Some(lower.into()),
            upper: Some(upper.into()),
            lower_inclusive: true,
            upper_inclusive: true,
        }
    }

    /// `lower <= field < upper`
    pub fn half_open(field: Field, lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        CompiledExpr::Range {
            field,
            lower: Some(lower.into()),
            upper: Some(upper.into()),
            lower_inclusive: true,
            upper_inclusive: false,
        }
    }

    pub fn at_least(field: Field, lower: impl Into<Value>) -> Self {
        CompiledExpr::Range {
            field,
            lower: Some(lower.into()),
            upper: None,
            lower_inclusive: true,
            upper_inclusive: false,
        }
    }

    pub fn after(field: Field, lower: impl Into<Value>) -> Self {
        CompiledExpr::Range {
            field,
            lower: Some(lower.into()),
            upper: None,
            lower_inclusive: false,
            upper_inclusive: false,
        }
    }

    /// Conjunction that flattens nested `And`s and folds constants.
    ///
    /// No operands yields `TRUE`; a single operand is returned as-is. Operand
    /// order is preserved.
    pub fn and(exprs: impl IntoIterator<Item = CompiledExpr>) -> Self {
        let mut flat = Vec::new();
        for expr in exprs {
            match expr {
                CompiledExpr::Always { value: true } => {}
                CompiledExpr::Always { value: false } => return CompiledExpr::FALSE,
                CompiledExpr::And { exprs } => flat.extend(exprs),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => CompiledExpr::TRUE,
            1 => flat.remove(0),
            _ => CompiledExpr::And { exprs: flat },
        }
    }

    /// Disjunction counterpart of [`CompiledExpr::and`]. No operands yields `FALSE`.
    pub fn or(exprs: impl IntoIterator<Item = CompiledExpr>) -> Self {
        let mut flat = Vec::new();
        for expr in exprs {
            match expr {
                CompiledExpr::Always { value: false } => {}
                CompiledExpr::Always { value: true } => return CompiledExpr::TRUE,
                CompiledExpr::Or { exprs } => flat.extend(exprs),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => CompiledExpr::FALSE,
            1 => flat.remove(0),
            _ => CompiledExpr::Or { exprs: flat },
        }
    }

    pub fn is_always_true(&self) -> bool {
        matches!(self, CompiledExpr::Always { value: true })
    }

    /// Every field the expression reads, in first-seen order.
    pub fn fields(&self) -> Vec<Field> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut Vec<Field>) {
        match self {
            CompiledExpr::Eq { field, .. }
            | CompiledExpr::InSet { field, .. }
            | CompiledExpr::Range { field, .. } => {
                if !out.contains(field) {
                    out.push(*field);
                }
            }
            CompiledExpr::And { exprs } | CompiledExpr::Or { exprs } => {
                for expr in exprs {
                    expr.collect_fields(out);
                }
            }
            CompiledExpr::Always { .. } => {}
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            CompiledExpr::And { exprs } | CompiledExpr::Or { exprs } => {
                1 + exprs.iter().map(CompiledExpr::node_count).sum::<usize>()
            }
            _ => 1,
        }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl fmt::Display for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompiledExpr::Eq { field, value } if value.is_null() => {
                write!(f, "{field} IS NULL")
            }
            CompiledExpr::Eq { field, value } if field.is_multi_valued() => {
                write!(f, "{field} CONTAINS {value}")
            }
            CompiledExpr::Eq { field, value } => write!(f, "{field} == {value}"),
            CompiledExpr::InSet { field, values } => {
                let op = if field.is_multi_valued() { "ANY IN" } else { "IN" };
                write!(f, "{field} {op} [")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            CompiledExpr::Range {
                field,
                lower,
                upper,
                lower_inclusive,
                upper_inclusive,
            } => match (lower, upper) {
                (Some(lower), Some(upper)) => {
                    let lo = if *lower_inclusive { "<=" } else { "<" };
                    let hi = if *upper_inclusive { "<=" } else { "<" };
                    write!(f, "{lower} {lo} {field} {hi} {upper}")
                }
                (Some(lower), None) => {
                    let op = if *lower_inclusive { ">=" } else { ">" };
                    write!(f, "{field} {op} {lower}")
                }
                (None, Some(upper)) => {
                    let op = if *upper_inclusive { "<=" } else { "<" };
                    write!(f, "{field} {op} {upper}")
                }
                (None, None) => write!(f, "{field} IS NOT NULL"),
            },
            CompiledExpr::And { exprs } => write_joined(f, exprs, " AND "),
            CompiledExpr::Or { exprs } => write_joined(f, exprs, " OR "),
            CompiledExpr::Always { value: true } => f.write_str("TRUE"),
            CompiledExpr::Always { value: false } => f.write_str("FALSE"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, exprs: &[CompiledExpr], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{expr}")?;
    }
    f.write_str(")")
}
