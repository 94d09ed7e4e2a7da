//! Media-related data models.

use crate::utils::fs::{is_subtitle_file, is_video_file};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Role a file plays in an episode batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Video,
    Subtitle,
    Other,
}

impl FileRole {
    /// Determine the role of a path from its extension.
    pub fn from_path(path: &Path) -> Self {
        if is_video_file(path) {
            FileRole::Video
        } else if is_subtitle_file(path) {
            FileRole::Subtitle
        } else {
            FileRole::Other
        }
    }
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileRole::Video => write!(f, "video"),
            FileRole::Subtitle => write!(f, "subtitle"),
            FileRole::Other => write!(f, "other"),
        }
    }
}

/// Hints extracted from a filename by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedHint {
    /// Detected series title.
    pub title: Option<String>,
    /// Detected episode number.
    pub episode: Option<u32>,
    /// Detected season number.
    pub season: Option<u32>,
    /// Release group (fansub tag).
    pub release_group: Option<String>,
    /// Resolution (e.g., "1080p").
    pub resolution: Option<String>,
    /// Video codec (e.g., "HEVC").
    pub video_codec: Option<String>,
    /// Audio codec (e.g., "FLAC").
    pub audio_codec: Option<String>,
}

/// A file selected for organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Absolute path to the file; identifies the file within a batch.
    pub path: PathBuf,
    /// File name without path.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// Extension without the leading dot, as found on disk.
    pub extension: String,
    /// What kind of track this file is.
    pub role: FileRole,
    /// Parser output, if parsing succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<ParsedHint>,
    /// Parser failure message, if parsing failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl SourceFile {
    /// Build a source file description without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let role = FileRole::from_path(&path);

        Self {
            path,
            name,
            size,
            extension,
            role,
            hint: None,
            parse_error: None,
        }
    }

    /// Build a source file from an existing path on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(crate::Error::PathNotFound(path.display().to_string()));
        }
        let metadata = std::fs::metadata(path)?;
        Ok(Self::new(path, metadata.len()))
    }

    /// Attach a parse hint.
    pub fn with_hint(mut self, hint: ParsedHint) -> Self {
        self.hint = Some(hint);
        self.parse_error = None;
        self
    }

    pub fn is_video(&self) -> bool {
        self.role == FileRole::Video
    }

    pub fn is_subtitle(&self) -> bool {
        self.role == FileRole::Subtitle
    }
}

/// Title variants of a metadata candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleVariants {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

impl TitleVariants {
    /// Preferred display title.
    ///
    /// Romaji first when `prefer_romaji` is set, English first otherwise;
    /// native is the last resort.
    pub fn preferred(&self, prefer_romaji: bool) -> Option<&str> {
        let (first, second) = if prefer_romaji {
            (&self.romaji, &self.english)
        } else {
            (&self.english, &self.romaji)
        };
        first
            .as_deref()
            .or(second.as_deref())
            .or(self.native.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Series metadata returned by the metadata provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataCandidate {
    /// Provider ID.
    pub id: u64,
    /// Title variants.
    pub title: TitleVariants,
    /// Format (e.g., "TV", "MOVIE", "OVA").
    pub format: Option<String>,
    /// Declared episode count.
    pub episodes: Option<u32>,
    /// Year the series started airing.
    pub season_year: Option<u32>,
    /// Cover art URL.
    pub cover_image: Option<String>,
}
