//! Plan materializer module.
//!
//! Creates hard links for a destination map:
//! - Source must exist and live on the same filesystem as the target
//! - Destination components are sanitized and parent directories created
//! - Existing targets are handled by the configured [`ConflictStrategy`]
//! - Links that the filesystem rejects as invalid fall back to a copy
//!
//! Files are processed concurrently and failures are reported per file.

use crate::generators::folder::generate_season_folder;
use crate::models::config::{ConflictStrategy, MAX_CONCURRENCY, MIN_CONCURRENCY};
use crate::models::process::{FileError, ProcessResult};
use crate::utils::fs::sanitize_relative_path;
use crate::Result;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;

/// Longest target path accepted without shortening, in bytes.
pub const MAX_PATH_LEN: usize = 260;

/// Stems longer than this are cut when a path is too long.
const SHORTEN_THRESHOLD: usize = 100;
const SHORTENED_STEM_CHARS: usize = 97;

/// Highest `_N` suffix tried by [`ConflictStrategy::Rename`].
const MAX_RENAME_ATTEMPTS: u32 = 100;

static SEASON_SEGMENT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(?i)Season\s*(\d+)", r"(?i)S(\d+)", r"第(\d+)季"]
        .iter()
        .map(|p| Regex::new(p).expect("season segment regex is valid"))
        .collect()
});

/// Input of one materialization batch.
#[derive(Debug, Clone)]
pub struct MaterializeRequest {
    /// Library root every destination is joined onto.
    pub output_root: PathBuf,
    /// Source path to destination path relative to `output_root`.
    pub destinations: BTreeMap<PathBuf, PathBuf>,
    /// Re-render the season segment of `anime/season/file` destinations.
    pub season_folder_template: Option<String>,
    pub conflict_strategy: ConflictStrategy,
    /// Concurrent link operations, clamped to 1..=10.
    pub concurrency: usize,
}

impl MaterializeRequest {
    pub fn new(output_root: impl Into<PathBuf>, destinations: BTreeMap<PathBuf, PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            destinations,
            season_folder_template: None,
            conflict_strategy: ConflictStrategy::default(),
            concurrency: 4,
        }
    }

    pub fn with_conflict_strategy(mut self, strategy: ConflictStrategy) -> Self {
        self.conflict_strategy = strategy;
        self
    }

    pub fn with_season_folder_template(mut self, template: impl Into<String>) -> Self {
        self.season_folder_template = Some(template.into());
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Linked (or copied) to the given path.
    Linked(PathBuf),
    /// Target already existed and was left in place.
    Skipped(PathBuf),
}

/// Hard-link materializer.
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    show_progress: bool,
}

impl Materializer {
    /// Create a materializer without progress output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a progress bar on stderr while applying.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Materialize every entry of the request.
    ///
    /// Never fails as a whole: each file ends up either processed or in
    /// `failed_files`, so the same request can be retried for what is left.
    pub async fn apply(&self, request: &MaterializeRequest) -> ProcessResult {
        let total = request.destinations.len();
        let limit = request.concurrency.clamp(MIN_CONCURRENCY, MAX_CONCURRENCY);

        tracing::info!(
            "Materializing {} files into {} (concurrency {})",
            total,
            request.output_root.display(),
            limit
        );

        let pb = self.progress_bar(total as u64);

        let outcomes: Vec<(PathBuf, Result<LinkOutcome>)> =
            stream::iter(request.destinations.iter())
                .map(|(source, destination)| {
                    let pb = &pb;
                    async move {
                        let result = link_one(source, destination, request).await;
                        pb.set_message(
                            source
                                .file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .to_string(),
                        );
                        pb.inc(1);
                        (source.clone(), result)
                    }
                })
                .buffer_unordered(limit)
                .collect()
                .await;

        pb.finish_and_clear();

        let mut processed = Vec::new();
        let mut failed = Vec::new();
        for (source, result) in outcomes {
            match result {
                Ok(LinkOutcome::Linked(target)) => {
                    tracing::debug!("Linked: {:?} -> {:?}", source, target);
                    processed.push(source);
                }
                Ok(LinkOutcome::Skipped(target)) => {
                    tracing::info!("Target exists, skipped: {:?}", target);
                    processed.push(source);
                }
                Err(e) => {
                    tracing::warn!("Failed to materialize {:?}: {}", source, e);
                    failed.push(FileError {
                        path: source,
                        error: e.to_string(),
                    });
                }
            }
        }

        processed.sort();
        failed.sort_by(|a, b| a.path.cmp(&b.path));

        let result = ProcessResult::from_outcomes(processed, failed);
        tracing::info!("{}", result.message);
        result
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        let template = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb
    }
}

/// Resolve the final target path for a destination.
pub fn target_path(destination: &Path, request: &MaterializeRequest) -> Result<PathBuf> {
    let mut relative = sanitize_relative_path(destination);
    if relative.as_os_str().is_empty() {
        return Err(crate::Error::MaterializeError(format!(
            "empty destination for {}",
            destination.display()
        )));
    }
    if let Some(ref template) = request.season_folder_template {
        relative = restyle_season_segment(&relative, template);
    }
    shorten_long_path(request.output_root.join(relative))
}

async fn link_one(
    source: &Path,
    destination: &Path,
    request: &MaterializeRequest,
) -> Result<LinkOutcome> {
    if !fs::try_exists(source).await? {
        return Err(crate::Error::PathNotFound(source.display().to_string()));
    }

    let mut target = target_path(destination, request)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await?;
        if !same_filesystem(source, parent).await? {
            return Err(crate::Error::DifferentFilesystems(format!(
                "{} -> {}",
                source.display(),
                parent.display()
            )));
        }
    }

    if fs::try_exists(&target).await? {
        match request.conflict_strategy {
            ConflictStrategy::Fail => {
                return Err(crate::Error::FileAlreadyExists(target.display().to_string()));
            }
            ConflictStrategy::Skip => return Ok(LinkOutcome::Skipped(target)),
            ConflictStrategy::Overwrite => {
                tracing::debug!("Overwriting {:?}", target);
                fs::remove_file(&target).await?;
            }
            ConflictStrategy::Rename => {
                target = resolve_conflict(&target).await?;
                tracing::debug!("Renamed to {:?}", target);
            }
        }
    }

    hard_link_with_fallback(source, &target).await?;
    Ok(LinkOutcome::Linked(target))
}

async fn hard_link_with_fallback(source: &Path, target: &Path) -> Result<()> {
    match fs::hard_link(source, target).await {
        Ok(()) => Ok(()),
        Err(e) if matches!(e.kind(), ErrorKind::InvalidInput | ErrorKind::InvalidData) => {
            tracing::warn!("Hard link rejected ({}), copying {:?} instead", e, source);
            fs::copy(source, target).await?;
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(crate::Error::PermissionDenied(target.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
async fn same_filesystem(source: &Path, target_dir: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;
    let source_meta = fs::metadata(source).await?;
    let target_meta = fs::metadata(target_dir).await?;
    Ok(source_meta.dev() == target_meta.dev())
}

#[cfg(windows)]
async fn same_filesystem(source: &Path, target_dir: &Path) -> Result<bool> {
    let source = fs::canonicalize(source).await?;
    let target_dir = fs::canonicalize(target_dir).await?;
    Ok(source.components().next() == target_dir.components().next())
}

#[cfg(not(any(unix, windows)))]
async fn same_filesystem(_source: &Path, _target_dir: &Path) -> Result<bool> {
    Ok(true)
}

/// First free `stem_N.ext` next to `target`, for N in 1..=100.
pub async fn resolve_conflict(target: &Path) -> Result<PathBuf> {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    let extension = target.extension().map(|e| e.to_string_lossy().to_string());

    for counter in 1..=MAX_RENAME_ATTEMPTS {
        let name = match extension {
            Some(ref ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        };
        let candidate = target.with_file_name(name);
        if !fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
    }

    Err(crate::Error::FileAlreadyExists(format!(
        "no free name for {} after {} attempts",
        target.display(),
        MAX_RENAME_ATTEMPTS
    )))
}

/// Shorten the file stem of paths longer than [`MAX_PATH_LEN`].
///
/// Stems over 100 characters are cut to 97 plus `...`. Paths still too long
/// afterwards are an error.
pub fn shorten_long_path(path: PathBuf) -> Result<PathBuf> {
    if path.as_os_str().len() <= MAX_PATH_LEN {
        return Ok(path);
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let shortened = if stem.chars().count() > SHORTEN_THRESHOLD {
        let cut: String = stem.chars().take(SHORTENED_STEM_CHARS).collect();
        let name = match path.extension() {
            Some(ext) => format!("{}....{}", cut, ext.to_string_lossy()),
            None => format!("{}...", cut),
        };
        path.with_file_name(name)
    } else {
        path.clone()
    };

    if shortened.as_os_str().len() > MAX_PATH_LEN {
        return Err(crate::Error::MaterializeError(format!(
            "target path too long ({} bytes): {}",
            path.as_os_str().len(),
            path.display()
        )));
    }

    tracing::warn!("Shortened long path to {:?}", shortened);
    Ok(shortened)
}

/// Season number named by a folder segment, 1 when none is found.
pub fn extract_season_from_path(segment: &str) -> u32 {
    SEASON_SEGMENT_RES
        .iter()
        .find_map(|re| {
            re.captures(segment)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
        .unwrap_or(1)
}

/// Re-render the season folder of `anime/season/.../file` paths.
///
/// Paths with fewer than three components are returned unchanged. A template
/// that renders empty removes the season folder.
pub fn restyle_season_segment(relative: &Path, template: &str) -> PathBuf {
    let parts: Vec<Component> = relative.components().collect();
    if parts.len() < 3 {
        return relative.to_path_buf();
    }

    let season = extract_season_from_path(&parts[1].as_os_str().to_string_lossy());
    let mut restyled = PathBuf::from(parts[0].as_os_str());
    if let Some(folder) = generate_season_folder(template, season) {
        restyled.push(folder);
    }
    for part in &parts[2..] {
        restyled.push(part.as_os_str());
    }
    restyled
}
