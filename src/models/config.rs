//! Configuration model.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Lowest accepted materializer concurrency.
pub const MIN_CONCURRENCY: usize = 1;
/// Highest accepted materializer concurrency.
pub const MAX_CONCURRENCY: usize = 10;

/// Naming templates and folder layout flags consumed by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Template for video file names.
    pub video_template: String,
    /// Template appended to the video template when naming subtitles.
    pub subtitle_suffix_template: String,
    /// Template for the per-series folder.
    pub anime_folder_template: String,
    /// Template for the season folder.
    pub season_folder_template: String,
    /// Whether to nest files under a per-series folder.
    pub create_anime_folders: bool,
    /// Whether to nest files under a season folder.
    pub organize_by_seasons: bool,
    /// Whether `{title}` prefers the romaji title over the English one.
    pub use_romaji_names: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            video_template: "{title_romaji} - S{season}E{episode:02}".to_string(),
            subtitle_suffix_template: String::new(),
            anime_folder_template: "{title_romaji} ({year})".to_string(),
            season_folder_template: "Season {season}".to_string(),
            create_anime_folders: true,
            organize_by_seasons: true,
            use_romaji_names: true,
        }
    }
}

/// What to do when a destination file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStrategy {
    /// Report the file as failed.
    #[default]
    Fail,
    /// Leave the existing file and count the source as processed.
    Skip,
    /// Replace the existing file.
    Overwrite,
    /// Link under the first free `name_N.ext`.
    Rename,
}

impl std::str::FromStr for ConflictStrategy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(ConflictStrategy::Fail),
            "skip" => Ok(ConflictStrategy::Skip),
            "overwrite" => Ok(ConflictStrategy::Overwrite),
            "rename" => Ok(ConflictStrategy::Rename),
            other => Err(crate::Error::ConfigError(format!(
                "unsupported conflict strategy: {}",
                other
            ))),
        }
    }
}

/// Whether manual name overrides survive a replan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverridePolicy {
    /// Every replan starts from computed names.
    #[default]
    Discard,
    /// Overrides are carried over for files still in the plan.
    Preserve,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Library root that destination paths are relative to.
    pub output_directory: PathBuf,
    /// Naming templates and layout flags.
    pub naming: NamingConfig,
    /// Maximum concurrent link operations.
    pub concurrent_limit: usize,
    /// Log level filter (e.g., "info", "debug").
    pub log_level: String,
    /// Whether to query AniList while planning.
    pub anilist_enabled: bool,
    /// Destination conflict handling.
    pub conflict_strategy: ConflictStrategy,
    /// Override handling on replan.
    pub override_policy: OverridePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: default_output_directory(),
            naming: NamingConfig::default(),
            concurrent_limit: 4,
            log_level: "info".to_string(),
            anilist_enabled: true,
            conflict_strategy: ConflictStrategy::default(),
            override_policy: OverridePolicy::default(),
        }
    }
}

impl Config {
    /// Concurrency limit clamped into the supported range.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrent_limit.clamp(MIN_CONCURRENCY, MAX_CONCURRENCY)
    }
}

fn default_output_directory() -> PathBuf {
    dirs::video_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("AnimeLibrary")
}

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("anime_organizer")
}

/// Default configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load configuration from the default location.
///
/// Falls back to defaults when the file is missing or unreadable.
pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        return Config::default();
    }

    match load_config_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Load configuration from a file. Missing fields take their defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to a file, creating parent directories.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    tracing::info!("Config saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naming_defaults() {
        let naming = NamingConfig::default();
        assert_eq!(naming.video_template, "{title_romaji} - S{season}E{episode:02}");
        assert_eq!(naming.season_folder_template, "Season {season}");
        assert!(naming.subtitle_suffix_template.is_empty());
        assert!(naming.create_anime_folders);
        assert!(naming.organize_by_seasons);
    }

    #[test]
    fn test_effective_concurrency_is_clamped() {
        let mut config = Config::default();
        config.concurrent_limit = 0;
        assert_eq!(config.effective_concurrency(), 1);
        config.concurrent_limit = 64;
        assert_eq!(config.effective_concurrency(), 10);
        config.concurrent_limit = 6;
        assert_eq!(config.effective_concurrency(), 6);
    }

    #[test]
    fn test_conflict_strategy_from_str() {
        assert_eq!("Skip".parse::<ConflictStrategy>().unwrap(), ConflictStrategy::Skip);
        assert_eq!("rename".parse::<ConflictStrategy>().unwrap(), ConflictStrategy::Rename);
        assert!("merge".parse::<ConflictStrategy>().is_err());
    }
}
