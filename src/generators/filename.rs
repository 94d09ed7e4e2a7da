//! File name generation for episodes and subtitle tracks.

use super::template::{PlaceholderValues, TemplateResolver};
use crate::models::config::NamingConfig;

/// Grouping key for subtitles without a syntactic suffix.
pub const DEFAULT_SUFFIX_KEY: &str = "default";

/// The second-to-last dot segment of a file name, if it has at least three.
///
/// `"Show.chs.ass"` yields `"chs"`; `"Show.ass"` yields nothing. No check is
/// made that the segment is a real language or style tag.
pub fn syntactic_suffix(filename: &str) -> Option<&str> {
    let segments: Vec<&str> = filename.split('.').collect();
    if segments.len() >= 3 {
        Some(segments[segments.len() - 2])
    } else {
        None
    }
}

/// Subtitle grouping key: the syntactic suffix, or `"default"`.
pub fn classify(filename: &str) -> &str {
    syntactic_suffix(filename).unwrap_or(DEFAULT_SUFFIX_KEY)
}

/// Resolve the video file name for an episode.
pub fn generate_video_filename(naming: &NamingConfig, values: &PlaceholderValues) -> String {
    TemplateResolver::default().resolve(&naming.video_template, values)
}

/// Resolve a subtitle file name.
///
/// The base name comes from the video template followed by the subtitle
/// suffix template. The source file's own suffix (e.g. `chs`) is then
/// inserted before the extension.
pub fn generate_subtitle_filename(
    naming: &NamingConfig,
    values: &PlaceholderValues,
    source_suffix: Option<&str>,
) -> String {
    let template = format!("{}{}", naming.video_template, naming.subtitle_suffix_template);
    let base = TemplateResolver::default().resolve(&template, values);

    match (source_suffix, values.ext.as_deref()) {
        (Some(suffix), Some(ext)) => insert_suffix_before_extension(&base, suffix, ext),
        _ => base,
    }
}

/// Insert `.suffix` between a name's stem and its `.ext`.
///
/// Names that already carry the suffix, or that do not end with the
/// extension, are returned unchanged.
pub fn insert_suffix_before_extension(name: &str, suffix: &str, ext: &str) -> String {
    let ext = ext.trim_start_matches('.');
    if suffix.is_empty() || ext.is_empty() {
        return name.to_string();
    }

    let ext_tail = format!(".{}", ext);
    let Some(stem) = name.strip_suffix(&ext_tail) else {
        return name.to_string();
    };

    if stem.ends_with(&format!(".{}", suffix)) {
        return name.to_string();
    }

    format!("{}.{}{}", stem, suffix, ext_tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naming(video: &str, subtitle: &str) -> NamingConfig {
        NamingConfig {
            video_template: video.to_string(),
            subtitle_suffix_template: subtitle.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("Show.ass"), "default");
        assert_eq!(classify("Show.chs.ass"), "chs");
        assert_eq!(classify("Show.chs.hi.ass"), "hi");
        assert_eq!(classify("Show"), "default");
        assert_eq!(classify("[Grp] Show - 01 [1080p].sc.srt"), "sc");
    }

    #[test]
    fn test_syntactic_suffix() {
        assert_eq!(syntactic_suffix("Show.tc.ass"), Some("tc"));
        assert_eq!(syntactic_suffix("Show.ass"), None);
    }

    #[test]
    fn test_generate_video_filename() {
        let values = PlaceholderValues {
            title_romaji: Some("Example".to_string()),
            episode: Some(1),
            season: Some(1),
            ext: Some("mkv".to_string()),
            ..Default::default()
        };
        let config = naming("{title_romaji} - S{season}E{episode:02}", "");
        let name = generate_video_filename(&config, &values);
        assert_eq!(name, "Example - S01E01.mkv");
    }

    #[test]
    fn test_subtitle_suffix_inserted_before_extension() {
        let values = PlaceholderValues {
            title_romaji: Some("Example".to_string()),
            episode: Some(3),
            ext: Some("ass".to_string()),
            ..Default::default()
        };
        let name = generate_subtitle_filename(
            &naming("{title_romaji} - {episode:02}", ""),
            &values,
            Some("chs"),
        );
        assert_eq!(name, "Example - 03.chs.ass");
    }

    #[test]
    fn test_subtitle_suffix_template_not_duplicated() {
        let values = PlaceholderValues {
            title_romaji: Some("Example".to_string()),
            episode: Some(3),
            ext: Some("ass".to_string()),
            ..Default::default()
        };
        let name = generate_subtitle_filename(
            &naming("{title_romaji} - {episode:02}", ".chs"),
            &values,
            Some("chs"),
        );
        assert_eq!(name, "Example - 03.chs.ass");
    }

    #[test]
    fn test_subtitle_without_suffix() {
        let values = PlaceholderValues {
            title_romaji: Some("Example".to_string()),
            episode: Some(1),
            ext: Some("srt".to_string()),
            ..Default::default()
        };
        let config = naming("{title_romaji} - {episode:02}", "");
        let name = generate_subtitle_filename(&config, &values, None);
        assert_eq!(name, "Example - 01.srt");
    }

    #[test]
    fn test_insert_suffix_is_idempotent() {
        let once = insert_suffix_before_extension("Example - 01.ass", "chs", "ass");
        assert_eq!(once, "Example - 01.chs.ass");
        assert_eq!(insert_suffix_before_extension(&once, "chs", "ass"), once);
        assert_eq!(insert_suffix_before_extension("no-ext", "chs", "ass"), "no-ext");
    }
}
