use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Inclusive range for scalar filters.
///
/// Both bounds always travel together; a range with a single bound cannot be
/// expressed, so clearing a range clears both ends at once.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub struct ScalarRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> ScalarRange<T> {
    /// Creates a range, swapping the bounds if they arrive reversed.
    pub fn new(min: T, max: T) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// Rebuilds a range from two independently persisted bounds.
    ///
    /// A pair with only one bound is malformed data and is treated as no range.
    pub fn from_bounds(min: Option<T>, max: Option<T>) -> Option<Self> {
        match (min, max) {
            (Some(min), Some(max)) => Some(Self::new(min, max)),
            (None, None) => None,
            _ => {
                warn!("discarding range with a single persisted bound");
                None
            }
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        &self.min <= value && value <= &self.max
    }
}

/// Wire shape of a persisted range; a missing bound reads as `None`.
#[derive(Deserialize)]
struct PersistedBounds<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<'de, T> Deserialize<'de> for ScalarRange<T>
where
    T: Deserialize<'de> + PartialOrd,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bounds = PersistedBounds::<T>::deserialize(deserializer)?;
        match (bounds.min, bounds.max) {
            (Some(min), Some(max)) => Ok(Self::new(min, max)),
            _ => Err(D::Error::custom("range requires both `min` and `max`")),
        }
    }
}

/// Deserializes an optional range leniently: bounds are ordered and a range
/// with a single bound is dropped instead of failing the enclosing value.
pub(crate) fn lenient_range<'de, D, T>(deserializer: D) -> Result<Option<ScalarRange<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + PartialOrd,
{
    let bounds = Option::<PersistedBounds<T>>::deserialize(deserializer)?;
    Ok(bounds.and_then(|bounds| ScalarRange::from_bounds(bounds.min, bounds.max)))
}

impl<T: Copy> ScalarRange<T> {
    pub fn bounds(&self) -> (T, T) {
        (self.min, self.max)
    }
}
