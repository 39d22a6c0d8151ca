pub use crate::error::{ModelError, Result as ModelResult};
pub use crate::filter_types::{MediaStatus, ShowType};
pub use crate::ids::{GenreId, ListId, MediaId, TagId};
pub use crate::media::{MediaRecord, SeasonAvailability, SeasonInfo};
pub use crate::media_type::MediaType;
pub use crate::numbers::StarRating;
pub use crate::watch::WatchState;
