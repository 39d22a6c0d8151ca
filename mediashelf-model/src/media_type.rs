use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;

/// The two kinds of media a library tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MediaType {
    /// A single feature film
    Movie,
    /// An episodic show with seasons
    Show,
}

impl MediaType {
    /// Stable lowercase name used in persisted data and compiled expressions.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Show => "show",
        }
    }

    pub fn is_episodic(&self) -> bool {
        matches!(self, MediaType::Show)
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Show => write!(f, "Show"),
        }
    }
}

impl FromStr for MediaType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "show" => Ok(MediaType::Show),
            other => Err(ModelError::UnknownVariant {
                kind: "media type",
                value: other.to_string(),
            }),
        }
    }
}
