use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A rating outside the `0..=10` half-star scale.
    RatingOutOfRange(i64),
    /// A stable name that does not map to any known enum variant.
    UnknownVariant { kind: &'static str, value: String },
    /// A watch-state string that does not follow the persisted grammar.
    InvalidWatchState(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::RatingOutOfRange(value) => {
                write!(f, "rating out of range: {value} (expected 0..=10 half stars)")
            }
            ModelError::UnknownVariant { kind, value } => {
                write!(f, "unknown {kind}: {value:?}")
            }
            ModelError::InvalidWatchState(raw) => {
                write!(f, "invalid watch state: {raw:?}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
