//! Destination folder generation.

use super::template::{PlaceholderValues, TemplateResolver};
use crate::models::config::NamingConfig;
use crate::models::media::MetadataCandidate;
use crate::utils::fs::sanitize_filename;
use std::path::PathBuf;

/// Generate the per-series folder name.
///
/// Titles fall back to `fallback_title` like file names do. Returns `None`
/// when the template resolves to nothing, so no empty directory level is
/// created.
pub fn generate_anime_folder(
    naming: &NamingConfig,
    candidate: Option<&MetadataCandidate>,
    fallback_title: Option<&str>,
) -> Option<String> {
    let values =
        PlaceholderValues::for_series(candidate, naming.use_romaji_names, fallback_title);

    let template = if values.year.is_none() {
        naming
            .anime_folder_template
            .replace("({year})", "")
            .replace("{year}", "")
    } else {
        naming.anime_folder_template.clone()
    };

    let folder = TemplateResolver::default().resolve(&template, &values);
    if folder.is_empty() {
        None
    } else {
        Some(sanitize_filename(&folder))
    }
}

/// Generate the season folder name.
///
/// Bare `{season}` is not padded: `"Season {season}"` gives `"Season 2"`.
pub fn generate_season_folder(template: &str, season: u32) -> Option<String> {
    let values = PlaceholderValues::default().with_season(season);
    let folder = TemplateResolver::with_bare_width(1).resolve(template, &values);
    if folder.is_empty() {
        None
    } else {
        Some(sanitize_filename(&folder))
    }
}

/// Build the destination of a file relative to the output root.
///
/// Layout is `[anime folder/][season folder/]file name`, each level
/// controlled by its flag in `naming`. With anime folders off and season
/// folders on, the season folder sits directly under the output root.
pub fn build_destination(
    season: Option<u32>,
    file_name: &str,
    naming: &NamingConfig,
    candidate: Option<&MetadataCandidate>,
    fallback_title: Option<&str>,
) -> PathBuf {
    let mut path = PathBuf::new();

    if naming.create_anime_folders {
        if let Some(folder) = generate_anime_folder(naming, candidate, fallback_title) {
            path.push(folder);
        }
    }

    if naming.organize_by_seasons {
        if let Some(folder) =
            season.and_then(|s| generate_season_folder(&naming.season_folder_template, s))
        {
            path.push(folder);
        }
    }

    path.push(sanitize_filename(file_name));
    path
}
