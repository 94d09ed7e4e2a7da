//! Filename parser module.
//!
//! Extracts hints from fansub-style release names such as
//! `[SubsPlease] Sousou no Frieren - 05 (1080p) [ABCD1234].mkv`:
//! - Release group (leading bracket)
//! - Title
//! - Season / episode markers (`S01E05`, ` - 05`, `EP05`)
//! - Resolution, video codec and audio codec tags
//!
//! A parse failure only means the planner falls back to its own filename
//! scanning for that file.

use crate::models::media::{ParsedHint, SourceFile};
use crate::Result;
use regex::Regex;
use std::sync::LazyLock;

static LEADING_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[([^\]]+)\]").expect("group regex is valid"));

static BRACKETED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]|\([^)]*\)").expect("bracket regex is valid"));

static RESOLUTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{3,4}p|4K|\d{3,4}x\d{3,4})\b").expect("resolution regex is valid")
});

static VIDEO_CODEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(x264|x265|h\.?264|h\.?265|HEVC|AVC|AV1)\b").expect("codec regex is valid")
});

static AUDIO_CODEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(AAC|FLAC|E-?AC-?3|AC3|DTS|OPUS|MP3)\b").expect("audio regex is valid")
});

static SEASON_EPISODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bS(\d{1,2})\s?E(\d{1,4})(?:v\d+)?\b").expect("SxxEyy regex is valid")
});

static DASH_EPISODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s-\s*(\d{1,4})(?:v\d+)?(?:\s|$)").expect("dash episode regex is valid")
});

static WORD_EPISODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:EP?|Episode)\s?(\d{1,4})(?:v\d+)?\b").expect("episode regex is valid")
});

static SEASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:S|Season\s?)(\d{1,2})\b").expect("season regex is valid")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Parse a file name into hints.
///
/// Fails with [`crate::Error::ParseError`] when no title can be found.
pub fn parse_filename(filename: &str) -> Result<ParsedHint> {
    let stem = strip_extension(filename);

    let release_group = LEADING_GROUP_RE
        .captures(stem)
        .map(|caps| caps[1].trim().to_string())
        .filter(|g| !g.is_empty());
    let resolution = RESOLUTION_RE.find(stem).map(|m| m.as_str().to_string());
    let video_codec = VIDEO_CODEC_RE.find(stem).map(|m| m.as_str().to_string());
    let audio_codec = AUDIO_CODEC_RE.find(stem).map(|m| m.as_str().to_string());

    // Title and numbering only look at text outside brackets.
    let mut text = BRACKETED_RE.replace_all(stem, " ").to_string();
    if !text.trim().contains(' ') {
        text = text.replace(['.', '_'], " ");
    }

    let (mut season, episode, cut) = if let Some(caps) = SEASON_EPISODE_RE.captures(&text) {
        (
            caps[1].parse().ok(),
            caps[2].parse().ok(),
            caps.get(0).map_or(text.len(), |m| m.start()),
        )
    } else if let Some(caps) = DASH_EPISODE_RE.captures(&text) {
        (None, caps[1].parse().ok(), caps.get(0).map_or(text.len(), |m| m.start()))
    } else if let Some(caps) = WORD_EPISODE_RE.captures(&text) {
        (None, caps[1].parse().ok(), caps.get(0).map_or(text.len(), |m| m.start()))
    } else {
        (None, None, text.len())
    };

    if season.is_none() {
        season = SEASON_RE
            .captures(&text)
            .and_then(|caps| caps[1].parse().ok());
    }

    let title = clean_title(&text[..cut]);
    if title.is_empty() {
        return Err(crate::Error::ParseError(filename.to_string()));
    }

    Ok(ParsedHint {
        title: Some(title),
        episode,
        season,
        release_group,
        resolution,
        video_codec,
        audio_codec,
    })
}

/// Parse every file, recording the hint or the failure on the file.
pub fn annotate(files: &mut [SourceFile]) {
    for file in files.iter_mut() {
        match parse_filename(&file.name) {
            Ok(hint) => {
                file.hint = Some(hint);
                file.parse_error = None;
            }
            Err(e) => {
                tracing::warn!("{}", e);
                file.hint = None;
                file.parse_error = Some(e.to_string());
            }
        }
    }
}

/// Drop a trailing `.ext` of up to five alphanumeric characters.
fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.len() <= 5
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => filename,
    }
}

/// Remove technical tags and separators left around a title.
fn clean_title(raw: &str) -> String {
    let without_tags = RESOLUTION_RE.replace_all(raw, " ");
    let without_tags = VIDEO_CODEC_RE.replace_all(&without_tags, " ");
    let without_tags = AUDIO_CODEC_RE.replace_all(&without_tags, " ");
    let without_tags = SEASON_RE.replace_all(&without_tags, " ");
    WHITESPACE_RE
        .replace_all(&without_tags, " ")
        .trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fansub_release() {
        let hint =
            parse_filename("[SubsPlease] Sousou no Frieren - 05 (1080p) [ABCD1234].mkv").unwrap();
        assert_eq!(hint.title.as_deref(), Some("Sousou no Frieren"));
        assert_eq!(hint.episode, Some(5));
        assert_eq!(hint.season, None);
        assert_eq!(hint.release_group.as_deref(), Some("SubsPlease"));
        assert_eq!(hint.resolution.as_deref(), Some("1080p"));
    }

    #[test]
    fn test_parse_scene_release() {
        let hint = parse_filename("Spy.x.Family.S02E03.1080p.WEB.x264-GRP.mkv").unwrap();
        assert_eq!(hint.title.as_deref(), Some("Spy x Family"));
        assert_eq!(hint.season, Some(2));
        assert_eq!(hint.episode, Some(3));
        assert_eq!(hint.video_codec.as_deref(), Some("x264"));
        assert_eq!(hint.release_group, None);
    }

    #[test]
    fn test_parse_codecs() {
        let hint = parse_filename("[Grp] Show - 12 [BD 1080p HEVC FLAC].mkv").unwrap();
        assert_eq!(hint.episode, Some(12));
        assert_eq!(hint.video_codec.as_deref(), Some("HEVC"));
        assert_eq!(hint.audio_codec.as_deref(), Some("FLAC"));
    }

    #[test]
    fn test_parse_episode_word() {
        let hint = parse_filename("Show EP07.mp4").unwrap();
        assert_eq!(hint.title.as_deref(), Some("Show"));
        assert_eq!(hint.episode, Some(7));
    }

    #[test]
    fn test_parse_failure() {
        assert!(parse_filename("[Grp] [1080p].mkv").is_err());
        assert!(parse_filename(" - 01.mkv").is_err());
    }

    #[test]
    fn test_annotate_records_failures() {
        let mut files = vec![
            SourceFile::new("/in/[Grp] Show - 01.mkv", 1),
            SourceFile::new("/in/[Grp] [1080p].mkv", 1),
        ];
        annotate(&mut files);
        assert!(files[0].hint.is_some());
        assert!(files[0].parse_error.is_none());
        assert!(files[1].hint.is_none());
        assert!(files[1].parse_error.is_some());
    }
}
