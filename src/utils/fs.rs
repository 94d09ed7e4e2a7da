//! File system utilities.

use crate::Result;
use std::path::{Component, Path, PathBuf};

/// Video file extensions (lowercase).
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "m4v", "ts", "m2ts", "webm", "flv",
];

/// Subtitle file extensions (lowercase).
pub const SUBTITLE_EXTENSIONS: &[&str] = &["ass", "ssa", "srt", "vtt", "sub"];

/// Longest file name kept by [`sanitize_filename`], in bytes.
const MAX_FILENAME_BYTES: usize = 200;

/// Check if a path exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(crate::Error::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// Get file extension in lowercase.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check if a file is a video file based on extension.
pub fn is_video_file(path: &Path) -> bool {
    get_extension(path)
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Check if a file is a subtitle file based on extension.
pub fn is_subtitle_file(path: &Path) -> bool {
    get_extension(path)
        .map(|ext| SUBTITLE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Make a single path component safe to create on any common filesystem.
///
/// Full-width punctuation is folded to ASCII, reserved characters and path
/// separators become `_`, control characters are dropped, and leading or
/// trailing dots and whitespace are trimmed. Empty results become
/// `unnamed_file`.
pub fn sanitize_filename(name: &str) -> String {
    let folded: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '☆' => '★',
            '～' => '~',
            '＆' => '&',
            '！' => '!',
            '？' => '?',
            '：' => ':',
            '；' => ';',
            '，' => ',',
            '。' => '.',
            '（' => '(',
            '）' => ')',
            '【' => '[',
            '】' => ']',
            '｛' => '{',
            '｝' => '}',
            '　' => ' ',
            _ => c,
        })
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();

    let mut sanitized = folded
        .trim_matches(|c: char| c.is_whitespace() || c == '.')
        .to_string();

    if sanitized.is_empty() {
        return "unnamed_file".to_string();
    }

    if sanitized.len() > MAX_FILENAME_BYTES {
        let mut cut = MAX_FILENAME_BYTES;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
    }

    sanitized
}

/// Sanitize every normal component of a relative path.
///
/// Root, prefix, `.` and `..` components are dropped so the result always
/// stays below whatever directory it is joined onto.
pub fn sanitize_relative_path(path: &Path) -> PathBuf {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(sanitize_filename(&name.to_string_lossy())),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(&PathBuf::from("episode.mkv")));
        assert!(is_video_file(&PathBuf::from("episode.MP4")));
        assert!(!is_video_file(&PathBuf::from("episode.ass")));
        assert!(!is_video_file(&PathBuf::from("episode.nfo")));
    }

    #[test]
    fn test_is_subtitle_file() {
        assert!(is_subtitle_file(&PathBuf::from("Show.chs.ass")));
        assert!(is_subtitle_file(&PathBuf::from("Show.SRT")));
        assert!(!is_subtitle_file(&PathBuf::from("Show.mkv")));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Fate/Zero"), "Fate_Zero");
        assert_eq!(sanitize_filename("Re：Zero？"), "Re_Zero_");
        assert_eq!(sanitize_filename("【Group】 Show"), "[Group] Show");
        assert_eq!(sanitize_filename("  .hidden. "), "hidden");
        assert_eq!(sanitize_filename("..."), "unnamed_file");
    }

    #[test]
    fn test_sanitize_filename_truncates_on_char_boundary() {
        let long = "進".repeat(100);
        let sanitized = sanitize_filename(&long);
        assert!(sanitized.len() <= 200);
        assert!(sanitized.chars().all(|c| c == '進'));
    }

    #[test]
    fn test_sanitize_relative_path_drops_escapes() {
        let path = sanitize_relative_path(Path::new("../Show: Part 2/Season 1/ep.mkv"));
        assert_eq!(path, PathBuf::from("Show_ Part 2/Season 1/ep.mkv"));
    }
}
