//! Directory scanner module.
//!
//! Scans directories recursively for video and subtitle files.

use crate::models::media::{FileRole, SourceFile};
use crate::utils::fs::ensure_directory;
use crate::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of scanning a directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Video and subtitle files found, sorted by path.
    pub files: Vec<SourceFile>,
    /// Files with any other extension.
    pub ignored: Vec<PathBuf>,
    /// Total files scanned.
    pub total_files_scanned: usize,
    /// Total directories scanned.
    pub total_dirs_scanned: usize,
}

impl ScanResult {
    pub fn video_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_video()).count()
    }

    pub fn subtitle_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_subtitle()).count()
    }
}

/// Scan a directory for video and subtitle files.
///
/// Symbolic links are followed. Entries that cannot be read are logged and
/// skipped.
pub fn scan_directory(path: &Path) -> Result<ScanResult> {
    ensure_directory(path)?;

    let mut result = ScanResult::default();

    for entry in WalkDir::new(path).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let entry_path = entry.path();

        if entry.file_type().is_dir() {
            result.total_dirs_scanned += 1;
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        result.total_files_scanned += 1;

        if FileRole::from_path(entry_path) == FileRole::Other {
            result.ignored.push(entry_path.to_path_buf());
            continue;
        }

        match entry.metadata() {
            Ok(metadata) => result.files.push(SourceFile::new(entry_path, metadata.len())),
            Err(e) => tracing::warn!("Failed to read file {:?}: {}", entry_path, e),
        }
    }

    // Sort results for consistent output
    result.files.sort_by(|a, b| a.path.cmp(&b.path));
    result.ignored.sort();

    tracing::info!(
        "Scanned {} files in {} directories: {} videos, {} subtitles, {} ignored",
        result.total_files_scanned,
        result.total_dirs_scanned,
        result.video_count(),
        result.subtitle_count(),
        result.ignored.len()
    );

    Ok(result)
}

/// Scan several sources. Directories are walked; plain files are taken as
/// an explicit selection. Paths found more than once are kept once.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut files: Vec<SourceFile> = Vec::new();

    for path in paths {
        if path.is_dir() {
            files.extend(scan_directory(path)?.files);
        } else {
            files.push(SourceFile::from_path(path)?);
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);
    Ok(files)
}

// Integration tests for scan_directory() live in tests/scanner_tests.rs
