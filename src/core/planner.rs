//! Plan generation module.
//!
//! Turns a file set, one selected metadata candidate and a naming
//! configuration into destination paths:
//! 1. Split files into videos and subtitles
//! 2. Sequence episodes (videos, then each subtitle suffix group)
//! 3. Resolve file names from the naming templates
//! 4. Build destination paths under the anime and season folders
//!
//! Planning performs no I/O and is deterministic: the same inputs always
//! produce an equal plan, so it is safe to replan after every edit.

use crate::core::sequencer::{self, Assignment};
use crate::generators::filename::{generate_subtitle_filename, generate_video_filename};
use crate::generators::folder::build_destination;
use crate::generators::template::PlaceholderValues;
use crate::models::config::NamingConfig;
use crate::models::media::{FileRole, MetadataCandidate, SourceFile};
use crate::models::plan::{OrganizationPlan, PlanDocument, PlanEntry, SkippedFile};
use crate::Result;
use chrono::Utc;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Current plan file version.
pub const PLAN_VERSION: &str = "1.0";

/// Plan the destination of every video and subtitle in `files`.
///
/// Files with role `Other` are listed as skipped. When the same path occurs
/// more than once only the first occurrence is planned.
pub fn plan(
    files: &[SourceFile],
    candidate: Option<&MetadataCandidate>,
    naming: &NamingConfig,
) -> OrganizationPlan {
    let mut seen: HashSet<&Path> = HashSet::new();
    let mut videos: Vec<&SourceFile> = Vec::new();
    let mut subtitles: Vec<&SourceFile> = Vec::new();
    let mut skipped: Vec<SkippedFile> = Vec::new();

    for file in files {
        if !seen.insert(file.path.as_path()) {
            tracing::warn!("Duplicate file in batch ignored: {}", file.path.display());
            continue;
        }
        match file.role {
            FileRole::Video => videos.push(file),
            FileRole::Subtitle => subtitles.push(file),
            FileRole::Other => skipped.push(SkippedFile {
                source: file.path.clone(),
                reason: "not a video or subtitle file".to_string(),
            }),
        }
    }

    tracing::debug!(
        "Planning {} videos and {} subtitles",
        videos.len(),
        subtitles.len()
    );

    let assignments = sequencer::sequence(&videos, &subtitles);

    let mut entries: Vec<PlanEntry> = videos
        .iter()
        .chain(subtitles.iter())
        .filter_map(|file| {
            assignments
                .get(&file.path)
                .map(|assignment| plan_entry(file, assignment, candidate, naming))
        })
        .collect();

    entries.sort_by(|a, b| a.source.cmp(&b.source));
    skipped.sort_by(|a, b| a.source.cmp(&b.source));

    OrganizationPlan { entries, skipped }
}

/// Resolve the name and destination of one sequenced file.
fn plan_entry(
    file: &SourceFile,
    assignment: &Assignment,
    candidate: Option<&MetadataCandidate>,
    naming: &NamingConfig,
) -> PlanEntry {
    if let Some(ref error) = file.parse_error {
        tracing::debug!("{}: parse failed ({}), using filename fallbacks", file.name, error);
    }

    let hint_title = file.hint.as_ref().and_then(|h| h.title.as_deref());
    let values = PlaceholderValues::for_series(candidate, naming.use_romaji_names, hint_title)
        .with_episode(assignment.episode)
        .with_season(assignment.season)
        .with_group(assignment.group.clone())
        .with_ext(file.extension.as_str());

    let preview_name = match file.role {
        FileRole::Subtitle => {
            generate_subtitle_filename(naming, &values, assignment.source_suffix.as_deref())
        }
        _ => generate_video_filename(naming, &values),
    };

    let destination = build_destination(
        Some(assignment.season),
        &preview_name,
        naming,
        candidate,
        hint_title,
    );

    PlanEntry {
        source: file.path.clone(),
        role: file.role,
        episode: assignment.episode,
        season: assignment.season,
        group: assignment.group.clone(),
        suffix_group: assignment.suffix_group.clone(),
        preview_name,
        destination,
        name_override: None,
    }
}

impl PlanDocument {
    /// Wrap a plan for saving.
    pub fn new(
        output_root: &Path,
        candidate: Option<MetadataCandidate>,
        naming: NamingConfig,
        plan: OrganizationPlan,
    ) -> Self {
        Self {
            version: PLAN_VERSION.to_string(),
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now().to_rfc3339(),
            output_root: output_root.to_path_buf(),
            candidate,
            naming,
            plan,
        }
    }
}

/// Save a plan document to a JSON file.
pub fn save_plan(document: &PlanDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(path)?;
    file.write_all(json.as_bytes())?;

    tracing::info!("Plan saved to {:?}", path);
    Ok(())
}

/// Load a plan document from a JSON file.
pub fn load_plan(path: &Path) -> Result<PlanDocument> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let document: PlanDocument = serde_json::from_str(&content)
        .map_err(|e| crate::Error::InvalidPlanFile(format!("{}: {}", path.display(), e)))?;

    if document.version != PLAN_VERSION {
        return Err(crate::Error::InvalidPlanFile(format!(
            "unsupported plan version {}",
            document.version
        )));
    }
    Ok(document)
}

/// Get the default plan output path inside `dir`.
pub fn default_plan_path(dir: &Path) -> PathBuf {
    let filename = format!("plan_{}.json", Utc::now().format("%Y%m%d_%H%M%S"));
    dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::{ParsedHint, TitleVariants};

    fn example_candidate() -> MetadataCandidate {
        MetadataCandidate {
            id: 42,
            title: TitleVariants {
                romaji: Some("Example".to_string()),
                english: None,
                native: None,
            },
            ..Default::default()
        }
    }

    fn flat_naming(template: &str) -> NamingConfig {
        NamingConfig {
            video_template: template.to_string(),
            subtitle_suffix_template: String::new(),
            create_anime_folders: false,
            organize_by_seasons: false,
            ..Default::default()
        }
    }

    fn files() -> Vec<SourceFile> {
        vec![
            SourceFile::new("/in/X-02.mkv", 100),
            SourceFile::new("/in/X.chs.ass", 1),
            SourceFile::new("/in/X-01.mkv", 100),
        ]
    }

    #[test]
    fn test_end_to_end_names() {
        let candidate = example_candidate();
        let naming = flat_naming("{title_romaji} - {episode:02}");
        let plan = plan(&files(), Some(&candidate), &naming);

        let name = |p: &str| plan.entry(Path::new(p)).unwrap().preview_name.clone();
        assert_eq!(name("/in/X-01.mkv"), "Example - 01.mkv");
        assert_eq!(name("/in/X-02.mkv"), "Example - 02.mkv");
        assert_eq!(name("/in/X.chs.ass"), "Example - 01.chs.ass");

        let sub = plan.entry(Path::new("/in/X.chs.ass")).unwrap();
        assert_eq!(sub.suffix_group.as_deref(), Some("chs"));
        assert_eq!(sub.destination, PathBuf::from("Example - 01.chs.ass"));
    }

    #[test]
    fn test_plan_is_idempotent() {
        let candidate = example_candidate();
        let naming = NamingConfig::default();
        let first = plan(&files(), Some(&candidate), &naming);
        let second = plan(&files(), Some(&candidate), &naming);
        assert_eq!(first, second);
    }

    #[test]
    fn test_plan_ignores_input_order() {
        let candidate = example_candidate();
        let naming = NamingConfig::default();
        let mut reversed = files();
        reversed.reverse();
        assert_eq!(
            plan(&files(), Some(&candidate), &naming),
            plan(&reversed, Some(&candidate), &naming)
        );
    }

    #[test]
    fn test_default_layout_nests_folders() {
        let mut candidate = example_candidate();
        candidate.season_year = Some(2024);
        let plan = plan(&files(), Some(&candidate), &NamingConfig::default());

        let entry = plan.entry(Path::new("/in/X-01.mkv")).unwrap();
        assert_eq!(
            entry.destination,
            PathBuf::from("Example (2024)/Season 1/Example - S01E01.mkv")
        );
    }

    #[test]
    fn test_other_files_are_skipped() {
        let mut input = files();
        input.push(SourceFile::new("/in/readme.txt", 1));
        let plan = plan(&input, None, &NamingConfig::default());

        assert_eq!(plan.entries.len(), 3);
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].source, PathBuf::from("/in/readme.txt"));
    }

    #[test]
    fn test_duplicate_paths_planned_once() {
        let mut input = files();
        input.push(SourceFile::new("/in/X-01.mkv", 100));
        let plan = plan(&input, None, &NamingConfig::default());
        assert_eq!(plan.entries.len(), 3);
    }

    #[test]
    fn test_without_candidate_uses_hint_title_and_drops_missing_fields() {
        let file = SourceFile::new("/in/[Grp] Parsed - 07.mkv", 1).with_hint(ParsedHint {
            title: Some("Parsed".to_string()),
            ..Default::default()
        });
        let naming = NamingConfig {
            video_template: "{title} - {episode} [{year}]".to_string(),
            ..Default::default()
        };
        let plan = plan(&[file], None, &naming);
        let entry = &plan.entries[0];

        assert_eq!(entry.preview_name, "Parsed - 01.mkv");
        assert_eq!(entry.group.as_deref(), Some("Grp"));
        assert_eq!(entry.destination, PathBuf::from("Parsed/Season 1/Parsed - 01.mkv"));
    }

    #[test]
    fn test_default_templates_without_candidate_use_parsed_title() {
        let file = SourceFile::new("/in/[Grp] Parsed - 07.mkv", 1).with_hint(ParsedHint {
            title: Some("Parsed".to_string()),
            ..Default::default()
        });
        let plan = plan(&[file], None, &NamingConfig::default());
        let entry = &plan.entries[0];

        assert_eq!(entry.preview_name, "Parsed - S01E01.mkv");
        assert_eq!(entry.destination, PathBuf::from("Parsed/Season 1/Parsed - S01E01.mkv"));
    }

    #[test]
    fn test_default_templates_with_english_only_candidate() {
        let candidate = MetadataCandidate {
            id: 7,
            title: TitleVariants {
                english: Some("English Title".to_string()),
                ..Default::default()
            },
            season_year: Some(2020),
            ..Default::default()
        };
        let plan = plan(&files(), Some(&candidate), &NamingConfig::default());
        let entry = plan.entry(Path::new("/in/X-01.mkv")).unwrap();

        assert_eq!(entry.preview_name, "English Title - S01E01.mkv");
        assert_eq!(
            entry.destination,
            PathBuf::from("English Title (2020)/Season 1/English Title - S01E01.mkv")
        );
    }

    #[test]
    fn test_group_placeholder_uses_fallback_group() {
        let file = SourceFile::new("/in/[SubsPlease] Show - 01.mkv", 1);
        let candidate = example_candidate();
        let naming = flat_naming("[{group}] {title} - {episode}");
        let plan = plan(&[file], Some(&candidate), &naming);
        assert_eq!(plan.entries[0].preview_name, "[SubsPlease] Example - 01.mkv");
    }

    #[test]
    fn test_candidate_switch_replans_cleanly() {
        let first = example_candidate();
        let mut second = example_candidate();
        second.title.romaji = Some("Another".to_string());
        let naming = flat_naming("{title_romaji} - {episode:02}");

        let before = plan(&files(), Some(&first), &naming);
        let after = plan(&files(), Some(&second), &naming);
        let again = plan(&files(), Some(&first), &naming);

        assert_ne!(before, after);
        assert_eq!(before, again);
        assert_eq!(after.entries[0].preview_name, "Another - 01.mkv");
    }

    #[test]
    fn test_save_and_load_plan() {
        let candidate = example_candidate();
        let naming = NamingConfig::default();
        let organization = plan(&files(), Some(&candidate), &naming);
        let document =
            PlanDocument::new(Path::new("/library"), Some(candidate), naming, organization);

        let temp_dir = tempfile::TempDir::new().unwrap();
        let plan_path = temp_dir.path().join("test_plan.json");

        save_plan(&document, &plan_path).unwrap();
        assert!(plan_path.exists());

        let loaded = load_plan(&plan_path).unwrap();
        assert_eq!(loaded.id, document.id);
        assert_eq!(loaded.output_root, PathBuf::from("/library"));
        assert_eq!(loaded.plan, document.plan);
    }

    #[test]
    fn test_default_plan_path() {
        let path = default_plan_path(Path::new("/tmp/library"));
        assert!(path.to_string_lossy().contains("plan_"));
        assert!(path.to_string_lossy().ends_with(".json"));
        assert!(path.starts_with("/tmp/library"));
    }
}
