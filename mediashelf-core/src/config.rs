//! Library-level tuning loaded from TOML or JSON.
//!
//! [`ShelfConfig::resolve`] takes the first of: an explicit file path
//! (`$MEDIASHELF_CONFIG_PATH`), inline JSON (`$MEDIASHELF_CONFIG_JSON`), a
//! default file such as `mediashelf.toml` or `config/mediashelf.json`, and
//! finally the built-in defaults.

use anyhow::{Context, anyhow};
use mediashelf_model::SeasonAvailability;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const CONFIG_PATH_ENV: &str = "MEDIASHELF_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "MEDIASHELF_CONFIG_JSON";

/// Source that produced the loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ShelfConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ShelfConfig {
    /// Which seasons count when deciding whether a show is caught up.
    pub seasons: SeasonsConfig,
    /// What the "Problems" list reports as missing information.
    pub problems: ProblemsConfig,
    pub upcoming: UpcomingConfig,
}

/// Announced seasons without episodes and seasons with a future (or unknown)
/// air date are not available by default. Flip these to treat them as
/// watchable when computing "caught up".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SeasonsConfig {
    pub count_unaired_seasons: bool,
    pub count_empty_seasons: bool,
}

impl SeasonsConfig {
    pub fn availability(&self) -> SeasonAvailability {
        SeasonAvailability {
            count_unaired: self.count_unaired_seasons,
            count_empty: self.count_empty_seasons,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProblemsConfig {
    /// Watched items without a personal rating are reported.
    pub require_rating: bool,
    /// Watched movies without a watch-again answer are reported.
    pub require_watch_again: bool,
}

impl Default for ProblemsConfig {
    fn default() -> Self {
        Self {
            require_rating: true,
            require_watch_again: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct UpcomingConfig {
    /// Shows whose first air date is in the future are listed next to movies.
    pub include_shows: bool,
}

impl Default for UpcomingConfig {
    fn default() -> Self {
        Self {
            include_shows: true,
        }
    }
}

impl ShelfConfig {
    /// Resolves configuration from the process environment, searching the
    /// working directory for a default file.
    pub fn load_from_env() -> anyhow::Result<(Self, ShelfConfigSource)> {
        Self::resolve(
            env::var(CONFIG_PATH_ENV).ok(),
            env::var(CONFIG_JSON_ENV).ok(),
            Path::new("."),
        )
    }

    /// Resolves configuration from explicit inputs. Blank values count as
    /// unset; default files are looked up under `search_dir`.
    pub fn resolve(
        path: Option<String>,
        inline_json: Option<String>,
        search_dir: &Path,
    ) -> anyhow::Result<(Self, ShelfConfigSource)> {
        let present = |value: Option<String>| value.filter(|raw| !raw.trim().is_empty());

        if let Some(path) = present(path).map(PathBuf::from) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ShelfConfigSource::EnvPath(path)));
        }

        if let Some(raw) = present(inline_json) {
            let config = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((config, ShelfConfigSource::EnvInline));
        }

        match default_file_in(search_dir) {
            Some(path) => Ok((Self::load_from_file(&path)?, ShelfConfigSource::File(path))),
            None => Ok((Self::default(), ShelfConfigSource::Default)),
        }
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read mediashelf config from {}", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents)
                .with_context(|| format!("invalid mediashelf config {}", path.display())),
            Some("toml") => toml::from_str(&contents)
                .with_context(|| format!("invalid mediashelf config {}", path.display())),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    /// Parses TOML, falling back to JSON.
    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse mediashelf config {origin}: toml error: {toml_err}; json error: {json_err}"
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).map_err(|err| anyhow!("invalid mediashelf config json: {err}"))
    }
}

const DEFAULT_FILES: [&str; 4] = [
    "mediashelf.toml",
    "mediashelf.json",
    "config/mediashelf.toml",
    "config/mediashelf.json",
];

fn default_file_in(dir: &Path) -> Option<PathBuf> {
    DEFAULT_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_exclude_unaired_and_empty_seasons() {
        let config = ShelfConfig::default();
        assert_eq!(config.seasons.availability(), SeasonAvailability::default());
        assert!(config.problems.require_rating);
        assert!(config.upcoming.include_shows);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = ShelfConfig::parse_from_str(
            "[seasons]\ncount_empty_seasons = true\n",
            "inline",
        )
        .unwrap();
        assert!(config.seasons.count_empty_seasons);
        assert!(!config.seasons.count_unaired_seasons);
        assert_eq!(config.problems, ProblemsConfig::default());
    }

    #[test]
    fn json_is_accepted_as_fallback() {
        let config = ShelfConfig::parse_from_str(
            r#"{"problems": {"require_rating": false}}"#,
            "inline",
        )
        .unwrap();
        assert!(!config.problems.require_rating);
        assert!(config.problems.require_watch_again);
    }

    #[test]
    fn loads_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[upcoming]\ninclude_shows = false").unwrap();
        let config = ShelfConfig::load_from_file(file.path()).unwrap();
        assert!(!config.upcoming.include_shows);
    }

    #[test]
    fn garbage_reports_both_parsers() {
        let err = ShelfConfig::parse_from_str("{{ nope", "inline").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("toml error"));
        assert!(message.contains("json error"));
    }

    #[test]
    fn explicit_path_wins_over_inline_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"upcoming": {"include_shows": false}}"#).unwrap();

        let (config, source) = ShelfConfig::resolve(
            Some(path.display().to_string()),
            Some(r#"{"problems": {"require_rating": false}}"#.into()),
            dir.path(),
        )
        .unwrap();
        assert_eq!(source, ShelfConfigSource::EnvPath(path));
        assert!(!config.upcoming.include_shows);
        assert!(config.problems.require_rating);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml").display().to_string();
        let err = ShelfConfig::resolve(Some(missing), None, dir.path()).unwrap_err();
        assert!(err.to_string().contains("failed to read mediashelf config"));
    }

    #[test]
    fn blank_path_falls_through_to_inline_json() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = ShelfConfig::resolve(
            Some("  ".into()),
            Some(r#"{"seasons": {"count_unaired_seasons": true}}"#.into()),
            dir.path(),
        )
        .unwrap();
        assert_eq!(source, ShelfConfigSource::EnvInline);
        assert!(config.seasons.count_unaired_seasons);

        let err = ShelfConfig::resolve(None, Some("not json".into()), dir.path()).unwrap_err();
        assert!(err.to_string().contains(CONFIG_JSON_ENV));
    }

    #[test]
    fn default_file_is_found_under_search_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        let path = dir.path().join("config/mediashelf.toml");
        fs::write(&path, "[problems]\nrequire_watch_again = false\n").unwrap();

        let (config, source) = ShelfConfig::resolve(None, Some(String::new()), dir.path()).unwrap();
        assert_eq!(source, ShelfConfigSource::File(path));
        assert!(!config.problems.require_watch_again);
    }

    #[test]
    fn empty_search_dir_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = ShelfConfig::resolve(None, None, dir.path()).unwrap();
        assert_eq!(source, ShelfConfigSource::Default);
        assert_eq!(config, ShelfConfig::default());
    }
}
