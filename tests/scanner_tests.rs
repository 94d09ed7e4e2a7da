//! Integration tests for the scanner module.
//!
//! Tests cover:
//! - Directory scanning with video and subtitle files
//! - Nested directories and ordering
//! - Error handling for non-existent paths

use anime_organizer::core::scanner::{collect_sources, scan_directory};
use anime_organizer::models::media::FileRole;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_scan_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let result = scan_directory(temp_dir.path()).unwrap();

    assert!(result.files.is_empty());
    assert_eq!(result.total_files_scanned, 0);
}

#[test]
fn test_scan_with_videos_and_subtitles() {
    let temp_dir = TempDir::new().unwrap();

    fs::write(temp_dir.path().join("[Grp] Show - 01.mkv"), "fake video").unwrap();
    fs::write(temp_dir.path().join("[Grp] Show - 01.chs.ass"), "fake sub").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not media").unwrap();

    let result = scan_directory(temp_dir.path()).unwrap();

    assert_eq!(result.files.len(), 2);
    assert_eq!(result.video_count(), 1);
    assert_eq!(result.subtitle_count(), 1);
    assert_eq!(result.ignored.len(), 1);
    assert_eq!(result.total_files_scanned, 3);

    let video = result.files.iter().find(|f| f.is_video()).unwrap();
    assert_eq!(video.name, "[Grp] Show - 01.mkv");
    assert_eq!(video.size, "fake video".len() as u64);
}

#[test]
fn test_scan_recurses_and_sorts_by_path() {
    let temp_dir = TempDir::new().unwrap();

    let nested = temp_dir.path().join("Batch").join("Extra");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("b.mp4"), "fake").unwrap();
    fs::write(temp_dir.path().join("a.mkv"), "fake").unwrap();
    fs::write(temp_dir.path().join("Batch").join("c.srt"), "fake").unwrap();

    let result = scan_directory(temp_dir.path()).unwrap();

    let paths: Vec<_> = result.files.iter().map(|f| f.path.clone()).collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
    assert_eq!(result.files.len(), 3);
    assert!(result.total_dirs_scanned >= 3);
}

#[test]
fn test_scan_extensions_are_case_insensitive() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("Show - 01.MKV"), "fake").unwrap();
    fs::write(temp_dir.path().join("Show - 01.ASS"), "fake").unwrap();

    let result = scan_directory(temp_dir.path()).unwrap();
    assert_eq!(result.video_count(), 1);
    assert_eq!(result.subtitle_count(), 1);
}

#[test]
fn test_scan_nonexistent_path() {
    let result = scan_directory(Path::new("/nonexistent/path"));
    assert!(result.is_err());
}

#[test]
fn test_scan_file_is_not_a_directory() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("a.mkv");
    fs::write(&file, "fake").unwrap();

    assert!(scan_directory(&file).is_err());
}

#[test]
fn test_collect_sources_mixes_files_and_directories() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("season");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("Show - 01.mkv"), "fake").unwrap();
    let single = temp_dir.path().join("Show - 02.mkv");
    fs::write(&single, "fake").unwrap();
    let readme = temp_dir.path().join("readme.txt");
    fs::write(&readme, "text").unwrap();

    let files = collect_sources(&[dir.clone(), single.clone(), single.clone(), readme]).unwrap();

    assert_eq!(files.len(), 3);
    assert_eq!(files.iter().filter(|f| f.path == single).count(), 1);
    // Explicitly selected files keep role Other.
    assert!(files.iter().any(|f| f.role == FileRole::Other));
}
