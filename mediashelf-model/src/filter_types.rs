use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Production status reported by the metadata provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MediaStatus {
    Rumored,
    Planned,
    InProduction,
    PostProduction,
    Released,
    Canceled,
    Pilot,
    ReturningSeries,
    Ended,
}

impl MediaStatus {
    pub fn all() -> &'static [MediaStatus] {
        use MediaStatus::*;
        &[
            Rumored,
            Planned,
            InProduction,
            PostProduction,
            Released,
            Canceled,
            Pilot,
            ReturningSeries,
            Ended,
        ]
    }

    /// Stable snake_case key used in compiled expressions.
    pub fn key(&self) -> &'static str {
        match self {
            MediaStatus::Rumored => "rumored",
            MediaStatus::Planned => "planned",
            MediaStatus::InProduction => "in_production",
            MediaStatus::PostProduction => "post_production",
            MediaStatus::Released => "released",
            MediaStatus::Canceled => "canceled",
            MediaStatus::Pilot => "pilot",
            MediaStatus::ReturningSeries => "returning_series",
            MediaStatus::Ended => "ended",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaStatus::Rumored => "Rumored",
            MediaStatus::Planned => "Planned",
            MediaStatus::InProduction => "In Production",
            MediaStatus::PostProduction => "Post Production",
            MediaStatus::Released => "Released",
            MediaStatus::Canceled => "Canceled",
            MediaStatus::Pilot => "Pilot",
            MediaStatus::ReturningSeries => "Returning Series",
            MediaStatus::Ended => "Ended",
        }
    }
}

impl fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for MediaStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaStatus::all()
            .iter()
            .copied()
            .find(|status| status.key() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "media status",
                value: s.to_string(),
            })
    }
}

/// Format of a show as reported by the metadata provider. Movies have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ShowType {
    Documentary,
    News,
    Miniseries,
    Reality,
    Scripted,
    TalkShow,
    Video,
}

impl ShowType {
    pub fn all() -> &'static [ShowType] {
        use ShowType::*;
        &[Documentary, News, Miniseries, Reality, Scripted, TalkShow, Video]
    }

    pub fn key(&self) -> &'static str {
        match self {
            ShowType::Documentary => "documentary",
            ShowType::News => "news",
            ShowType::Miniseries => "miniseries",
            ShowType::Reality => "reality",
            ShowType::Scripted => "scripted",
            ShowType::TalkShow => "talk_show",
            ShowType::Video => "video",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShowType::Documentary => "Documentary",
            ShowType::News => "News",
            ShowType::Miniseries => "Miniseries",
            ShowType::Reality => "Reality",
            ShowType::Scripted => "Scripted",
            ShowType::TalkShow => "Talk Show",
            ShowType::Video => "Video",
        }
    }
}

impl fmt::Display for ShowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ShowType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShowType::all()
            .iter()
            .copied()
            .find(|show_type| show_type.key() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "show type",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_back() {
        for status in MediaStatus::all() {
            assert_eq!(status.key().parse::<MediaStatus>().unwrap(), *status);
        }
        for show_type in ShowType::all() {
            assert_eq!(show_type.key().parse::<ShowType>().unwrap(), *show_type);
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!("Returning Series".parse::<MediaStatus>().is_err());
        assert!("sitcom".parse::<ShowType>().is_err());
    }
}
