//! Materialization result model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of materializing a destination map.
///
/// Failures are itemized per file; the batch is never all-or-nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessResult {
    /// True when at least one file was materialized, or nothing failed.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Source paths that were linked (or skipped as already present).
    pub processed_files: Vec<PathBuf>,
    /// Source paths that failed, with the reason.
    pub failed_files: Vec<FileError>,
}

impl ProcessResult {
    /// Build a result from per-file outcomes.
    pub fn from_outcomes(processed_files: Vec<PathBuf>, failed_files: Vec<FileError>) -> Self {
        let total = processed_files.len() + failed_files.len();
        let success = !processed_files.is_empty() || failed_files.is_empty();
        let message = format!(
            "Processed {}/{}, failed {}",
            processed_files.len(),
            total,
            failed_files.len()
        );

        Self {
            success,
            message,
            processed_files,
            failed_files,
        }
    }

    /// Whether any file failed.
    pub fn has_failures(&self) -> bool {
        !self.failed_files.is_empty()
    }
}

/// A single failed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    /// Source path.
    pub path: PathBuf,
    /// Failure description.
    pub error: String,
}
