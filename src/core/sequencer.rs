//! Episode sequencing.
//!
//! Episode numbers come from the visible name order, not from parsed hints:
//! videos are sorted by file name and numbered 1..N, and each subtitle
//! suffix group is sorted and numbered 1..M on its own.
//!
//! Season and release group prefer the parse hint and fall back to scanning
//! the file name.

use crate::generators::filename::{classify, syntactic_suffix};
use crate::models::media::SourceFile;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Season used when neither the hint nor the file name has one.
pub const DEFAULT_SEASON: u32 = 1;

static SEASON_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)S(\d+)").expect("season regex is valid"));

static BRACKET_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("bracket regex is valid"));

/// Sequencing result for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Episode number within the file's sequence.
    pub episode: u32,
    /// Season number.
    pub season: u32,
    /// Release group, if known.
    pub group: Option<String>,
    /// Subtitle group key (`None` for videos).
    pub suffix_group: Option<String>,
    /// The subtitle's own syntactic suffix, to carry into its new name.
    pub source_suffix: Option<String>,
}

/// Assignments keyed by source path.
pub type Assignments = BTreeMap<PathBuf, Assignment>;

/// Season number from the first `S<digits>` in a file name.
///
/// Matches anywhere, case-insensitively, so `"[Grp] Show S2 - 01"` gives 2.
pub fn extract_season_tag(filename: &str) -> Option<u32> {
    SEASON_TAG_RE
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Contents of the first non-empty `[...]` token in a file name.
///
/// The first bracket is taken even when it holds a resolution or hash
/// rather than a release group.
pub fn extract_bracket_group(filename: &str) -> Option<String> {
    BRACKET_GROUP_RE
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Season for a file: hint, then file name, then [`DEFAULT_SEASON`].
pub fn resolve_season(file: &SourceFile) -> u32 {
    file.hint
        .as_ref()
        .and_then(|h| h.season)
        .or_else(|| extract_season_tag(&file.name))
        .unwrap_or(DEFAULT_SEASON)
}

/// Release group for a file: hint, then first bracketed token.
pub fn resolve_group(file: &SourceFile) -> Option<String> {
    file.hint
        .as_ref()
        .and_then(|h| h.release_group.clone())
        .filter(|g| !g.trim().is_empty())
        .or_else(|| extract_bracket_group(&file.name))
}

/// Sort by display name, then path, so the order is total.
fn sort_by_name(files: &mut [&SourceFile]) {
    files.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
}

/// Assign episode numbers to videos and to each subtitle suffix group.
pub fn sequence(videos: &[&SourceFile], subtitles: &[&SourceFile]) -> Assignments {
    let mut assignments = Assignments::new();

    let mut ordered: Vec<&SourceFile> = videos.to_vec();
    sort_by_name(&mut ordered);
    for (index, file) in ordered.iter().enumerate() {
        assignments.insert(
            file.path.clone(),
            Assignment {
                episode: index as u32 + 1,
                season: resolve_season(file),
                group: resolve_group(file),
                suffix_group: None,
                source_suffix: None,
            },
        );
    }

    let mut groups: BTreeMap<&str, Vec<&SourceFile>> = BTreeMap::new();
    for &file in subtitles {
        groups.entry(classify(&file.name)).or_default().push(file);
    }

    for (key, mut members) in groups {
        sort_by_name(&mut members);
        tracing::debug!("Subtitle group '{}': {} files", key, members.len());
        for (index, file) in members.iter().enumerate() {
            assignments.insert(
                file.path.clone(),
                Assignment {
                    episode: index as u32 + 1,
                    season: resolve_season(file),
                    group: resolve_group(file),
                    suffix_group: Some(key.to_string()),
                    source_suffix: syntactic_suffix(&file.name).map(str::to_string),
                },
            );
        }
    }

    assignments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::ParsedHint;
    use std::path::Path;

    fn file(path: &str) -> SourceFile {
        SourceFile::new(path, 0)
    }

    #[test]
    fn test_videos_follow_name_order() {
        let b = file("/in/B.mkv");
        let a = file("/in/A.mkv");
        let result = sequence(&[&b, &a], &[]);
        assert_eq!(result[Path::new("/in/A.mkv")].episode, 1);
        assert_eq!(result[Path::new("/in/B.mkv")].episode, 2);
    }

    #[test]
    fn test_order_is_case_sensitive() {
        let lower = file("/in/a.mkv");
        let upper = file("/in/B.mkv");
        let result = sequence(&[&lower, &upper], &[]);
        // Uppercase sorts before lowercase in byte order.
        assert_eq!(result[Path::new("/in/B.mkv")].episode, 1);
        assert_eq!(result[Path::new("/in/a.mkv")].episode, 2);
    }

    #[test]
    fn test_name_order_overrides_hint_episode() {
        let first = file("/in/Show - 01.mkv").with_hint(ParsedHint {
            episode: Some(12),
            ..Default::default()
        });
        let second = file("/in/Show - 02.mkv").with_hint(ParsedHint {
            episode: Some(13),
            ..Default::default()
        });
        let result = sequence(&[&second, &first], &[]);
        assert_eq!(result[Path::new("/in/Show - 01.mkv")].episode, 1);
        assert_eq!(result[Path::new("/in/Show - 02.mkv")].episode, 2);
    }

    #[test]
    fn test_duplicate_names_break_ties_by_path() {
        let x = file("/b/Show.mkv");
        let y = file("/a/Show.mkv");
        let result = sequence(&[&x, &y], &[]);
        assert_eq!(result[Path::new("/a/Show.mkv")].episode, 1);
        assert_eq!(result[Path::new("/b/Show.mkv")].episode, 2);
    }

    #[test]
    fn test_subtitle_groups_number_independently() {
        let chs1 = file("/in/Show - 01.chs.ass");
        let chs2 = file("/in/Show - 02.chs.ass");
        let cht1 = file("/in/Show - 01.cht.ass");
        let plain = file("/in/Show - 05.ass");
        let result = sequence(&[], &[&chs2, &cht1, &plain, &chs1]);

        let chs2_assignment = &result[Path::new("/in/Show - 02.chs.ass")];
        assert_eq!(chs2_assignment.episode, 2);
        assert_eq!(chs2_assignment.suffix_group.as_deref(), Some("chs"));
        assert_eq!(chs2_assignment.source_suffix.as_deref(), Some("chs"));

        assert_eq!(result[Path::new("/in/Show - 01.cht.ass")].episode, 1);

        let plain_assignment = &result[Path::new("/in/Show - 05.ass")];
        assert_eq!(plain_assignment.episode, 1);
        assert_eq!(plain_assignment.suffix_group.as_deref(), Some("default"));
        assert_eq!(plain_assignment.source_suffix, None);
    }

    #[test]
    fn test_extract_season_tag() {
        assert_eq!(extract_season_tag("Show S2 - 01.mkv"), Some(2));
        assert_eq!(extract_season_tag("show.s03e04.mkv"), Some(3));
        assert_eq!(extract_season_tag("Show - 01.mkv"), None);
    }

    #[test]
    fn test_extract_bracket_group() {
        assert_eq!(
            extract_bracket_group("[SubsPlease] Show - 01 [1080p].mkv"),
            Some("SubsPlease".to_string())
        );
        // First bracket wins even when it is not a group.
        assert_eq!(
            extract_bracket_group("Show - 01 [1080p][ABCD1234].mkv"),
            Some("1080p".to_string())
        );
        assert_eq!(extract_bracket_group("Show [] - 01.mkv"), None);
        assert_eq!(extract_bracket_group("Show - 01.mkv"), None);
    }

    #[test]
    fn test_season_and_group_prefer_hint() {
        let hinted = file("/in/[Grp] Show S3 - 01.mkv").with_hint(ParsedHint {
            season: Some(2),
            release_group: Some("Other".to_string()),
            ..Default::default()
        });
        assert_eq!(resolve_season(&hinted), 2);
        assert_eq!(resolve_group(&hinted).as_deref(), Some("Other"));

        let bare = file("/in/[Grp] Show S3 - 01.mkv");
        assert_eq!(resolve_season(&bare), 3);
        assert_eq!(resolve_group(&bare).as_deref(), Some("Grp"));

        let nothing = file("/in/Show - 01.mkv");
        assert_eq!(resolve_season(&nothing), DEFAULT_SEASON);
        assert_eq!(resolve_group(&nothing), None);
    }
}
