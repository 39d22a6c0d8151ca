use crate::error::{ModelError, Result};

/// Personal rating stored as half stars (0 = no stars, 10 = five stars).
///
/// Ratings are kept as integers to avoid floating point hashing and
/// comparison issues when they are used as range bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct StarRating(u8);

impl StarRating {
    /// Highest representable value in half stars.
    pub const MAX_HALF_STARS: u8 = 10;

    pub const ZERO: StarRating = StarRating(0);
    pub const FIVE_STARS: StarRating = StarRating(Self::MAX_HALF_STARS);

    pub fn from_half_stars(half_stars: u8) -> Result<Self> {
        if half_stars > Self::MAX_HALF_STARS {
            return Err(ModelError::RatingOutOfRange(half_stars as i64));
        }
        Ok(StarRating(half_stars))
    }

    /// Whole-star constructor, clamped to five stars.
    pub fn stars(stars: u8) -> Self {
        StarRating(stars.saturating_mul(2).min(Self::MAX_HALF_STARS))
    }

    /// Rounds a fractional star value to the nearest half star.
    pub fn from_stars_f32(stars: f32) -> Self {
        let clamped = stars.clamp(0.0, 5.0);
        StarRating((clamped * 2.0).round() as u8)
    }

    pub fn half_stars(&self) -> u8 {
        self.0
    }

    pub fn as_stars_f32(&self) -> f32 {
        self.0 as f32 / 2.0
    }
}

impl TryFrom<u8> for StarRating {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self> {
        StarRating::from_half_stars(value)
    }
}

impl From<StarRating> for u8 {
    fn from(value: StarRating) -> Self {
        value.0
    }
}

impl std::fmt::Display for StarRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}★", self.as_stars_f32())
    }
}
