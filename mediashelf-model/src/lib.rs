//! Core data model definitions shared across MediaShelf crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod error;
pub mod filter_types;
pub mod ids;
pub mod media;
pub mod media_type;
pub mod numbers;
pub mod prelude;
pub mod watch;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use filter_types::{MediaStatus, ShowType};
pub use ids::{GenreId, ListId, MediaId, TagId};
pub use media::{MediaRecord, SeasonAvailability, SeasonInfo};
pub use media_type::MediaType;
pub use numbers::StarRating;
pub use watch::WatchState;
