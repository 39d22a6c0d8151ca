//! Watch progress for episodic and non-episodic media.
//!
//! A [`WatchState`] is a view over the two scalar progress fields stored on a
//! record (last watched season and episode). It has a stable textual form that
//! is persisted as-is:
//!
//! - `notWatched`
//! - `season,<n>`: watched through the end of season `n`
//! - `episode,<s>,<e>`: watched through episode `e` of season `s`

use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::ModelError;

const NOT_WATCHED: &str = "notWatched";
const SEASON: &str = "season";
const EPISODE: &str = "episode";

/// Progress marker for a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub enum WatchState {
    NotWatched,
    /// Fully watched through the given season.
    Season(NonZeroU32),
    /// Watched through a specific episode within a season.
    Episode {
        season: NonZeroU32,
        episode: NonZeroU32,
    },
}

impl WatchState {
    /// Builds a state from raw season/episode numbers.
    ///
    /// A season of zero or below means nothing was watched. A missing or
    /// non-positive episode means the whole season was watched.
    pub fn construct(season: i64, episode: Option<i64>) -> Self {
        let Some(season) = positive(season) else {
            return WatchState::NotWatched;
        };
        match episode.and_then(positive) {
            Some(episode) => WatchState::Episode { season, episode },
            None => WatchState::Season(season),
        }
    }

    /// Builds a state from the persisted record fields. An absent season
    /// field means the progress is unknown, not "not watched".
    pub fn from_fields(season: Option<i64>, episode: Option<i64>) -> Option<Self> {
        season.map(|season| WatchState::construct(season, episode))
    }

    /// Splits the state back into the persisted `(season, episode)` fields.
    pub fn to_fields(&self) -> (i64, Option<i64>) {
        match self {
            WatchState::NotWatched => (0, None),
            WatchState::Season(season) => (season.get() as i64, None),
            WatchState::Episode { season, episode } => {
                (season.get() as i64, Some(episode.get() as i64))
            }
        }
    }

    /// Parses the persisted textual form. Malformed input yields `None` so that
    /// legacy data degrades to "unknown" instead of failing.
    pub fn decode(raw: &str) -> Option<Self> {
        let mut parts = raw.split(',');
        let head = parts.next()?;
        let state = match head {
            NOT_WATCHED => WatchState::NotWatched,
            SEASON => {
                let season = parse_uint(parts.next()?)?;
                WatchState::construct(season, None)
            }
            EPISODE => {
                let season = parse_uint(parts.next()?)?;
                let episode = parse_uint(parts.next()?)?;
                WatchState::construct(season, Some(episode))
            }
            _ => return None,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(state)
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn season(&self) -> Option<u32> {
        match self {
            WatchState::NotWatched => None,
            WatchState::Season(season) | WatchState::Episode { season, .. } => {
                Some(season.get())
            }
        }
    }

    pub fn episode(&self) -> Option<u32> {
        match self {
            WatchState::Episode { episode, .. } => Some(episode.get()),
            _ => None,
        }
    }

    pub fn has_progress(&self) -> bool {
        !matches!(self, WatchState::NotWatched)
    }

    /// Whether this state covers everything that is currently available.
    ///
    /// `max_season` is the highest available season (0 when nothing is
    /// available yet) and `max_episode_for_season` reports the episode count
    /// of a given season.
    pub fn is_caught_up<F>(&self, max_season: u32, max_episode_for_season: F) -> bool
    where
        F: Fn(u32) -> u32,
    {
        match self {
            WatchState::NotWatched => max_season == 0,
            WatchState::Season(season) => season.get() >= max_season,
            WatchState::Episode { season, episode } => {
                season.get() >= max_season
                    && episode.get() >= max_episode_for_season(season.get())
            }
        }
    }

    // Season(s) sorts after every Episode(s, _).
    fn rank(&self) -> (u32, u64) {
        match self {
            WatchState::NotWatched => (0, 0),
            WatchState::Season(season) => (season.get(), u64::MAX),
            WatchState::Episode { season, episode } => {
                (season.get(), episode.get() as u64)
            }
        }
    }
}

fn positive(value: i64) -> Option<NonZeroU32> {
    if value <= 0 {
        return None;
    }
    NonZeroU32::new(value.min(u32::MAX as i64) as u32)
}

fn parse_uint(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok().map(i64::from)
}

impl Ord for WatchState {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for WatchState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchState::NotWatched => f.write_str(NOT_WATCHED),
            WatchState::Season(season) => write!(f, "{SEASON},{season}"),
            WatchState::Episode { season, episode } => {
                write!(f, "{EPISODE},{season},{episode}")
            }
        }
    }
}

impl FromStr for WatchState {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WatchState::decode(s).ok_or_else(|| ModelError::InvalidWatchState(s.to_string()))
    }
}

impl From<WatchState> for String {
    fn from(value: WatchState) -> Self {
        value.encode()
    }
}

impl TryFrom<String> for WatchState {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(season: i64, episode: i64) -> WatchState {
        WatchState::construct(season, Some(episode))
    }

    #[test]
    fn construct_applies_positivity_rules() {
        assert_eq!(WatchState::construct(0, Some(4)), WatchState::NotWatched);
        assert_eq!(WatchState::construct(-3, None), WatchState::NotWatched);
        assert_eq!(WatchState::construct(2, None).encode(), "season,2");
        assert_eq!(WatchState::construct(2, Some(0)).encode(), "season,2");
        assert_eq!(WatchState::construct(2, Some(-1)).encode(), "season,2");
        assert_eq!(episode(2, 5).encode(), "episode,2,5");
    }

    #[test]
    fn encode_decode_round_trip() {
        for season in 1..=4 {
            let whole = WatchState::construct(season, None);
            assert_eq!(WatchState::decode(&whole.encode()), Some(whole));
            for ep in 1..=12 {
                let state = episode(season, ep);
                assert_eq!(WatchState::decode(&state.encode()), Some(state));
            }
        }
        for season in [-5, 0] {
            let state = WatchState::construct(season, Some(3));
            assert_eq!(state.encode(), "notWatched");
            assert_eq!(WatchState::decode(&state.encode()), Some(state));
        }
    }

    #[test]
    fn malformed_strings_decode_to_none() {
        for raw in [
            "",
            "watched",
            "NotWatched",
            "notWatched,1",
            "season",
            "season,",
            "season,-1",
            "season, 2",
            "season,2,",
            "season,x",
            "episode,1",
            "episode,1,2,3",
            "episode,+1,2",
            "episode,99999999999,1",
        ] {
            assert_eq!(WatchState::decode(raw), None, "{raw:?}");
        }
        assert!("season,x".parse::<WatchState>().is_err());
    }

    #[test]
    fn zero_components_normalize_like_construct() {
        assert_eq!(WatchState::decode("season,0"), Some(WatchState::NotWatched));
        assert_eq!(
            WatchState::decode("episode,3,0"),
            Some(WatchState::construct(3, None))
        );
    }

    #[test]
    fn ordering_compares_season_first() {
        let not_watched = WatchState::NotWatched;
        let s1 = WatchState::construct(1, None);
        let s1e9 = episode(1, 9);
        let s2e1 = episode(2, 1);
        let s2e5 = episode(2, 5);
        let s2 = WatchState::construct(2, None);

        let mut states = vec![s2, s2e5, s1, not_watched, s2e1, s1e9];
        states.sort();
        assert_eq!(states, vec![not_watched, s1e9, s1, s2e1, s2e5, s2]);
    }

    #[test]
    fn caught_up_requires_last_available_episode() {
        let state = episode(2, 5);
        assert!(state.is_caught_up(2, |_| 5));
        assert!(!state.is_caught_up(2, |_| 6));
        assert!(!state.is_caught_up(3, |_| 5));

        assert!(WatchState::construct(3, None).is_caught_up(2, |_| 10));
        assert!(!WatchState::construct(1, None).is_caught_up(2, |_| 10));
        assert!(WatchState::NotWatched.is_caught_up(0, |_| 0));
        assert!(!WatchState::NotWatched.is_caught_up(1, |_| 8));
    }

    #[test]
    fn fields_round_trip() {
        let state = episode(4, 2);
        let (season, ep) = state.to_fields();
        assert_eq!(WatchState::from_fields(Some(season), ep), Some(state));
        assert_eq!(WatchState::from_fields(None, Some(3)), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_persisted_string() {
        let json = serde_json::to_string(&episode(1, 3)).unwrap();
        assert_eq!(json, "\"episode,1,3\"");
        let parsed: WatchState = serde_json::from_str("\"season,7\"").unwrap();
        assert_eq!(parsed, WatchState::construct(7, None));
        assert!(serde_json::from_str::<WatchState>("\"garbage\"").is_err());
    }
}
