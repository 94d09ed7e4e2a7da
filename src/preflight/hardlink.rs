//! Hardlink capability preflight check.

use super::CheckResult;
use crate::Result;
use std::fs;
use std::path::Path;

/// Check whether files under `source_dir` can be hard-linked into
/// `target_dir`.
///
/// The source directory must exist. The target directory is created if it
/// is missing. Returns `false` when the two are on different filesystems.
pub fn probe(source_dir: &Path, target_dir: &Path) -> Result<bool> {
    if !source_dir.exists() {
        return Err(crate::Error::PathNotFound(source_dir.display().to_string()));
    }
    if !target_dir.exists() {
        tracing::info!("Creating target directory {:?}", target_dir);
        fs::create_dir_all(target_dir)?;
    }
    same_device(source_dir, target_dir)
}

#[cfg(unix)]
fn same_device(a: &Path, b: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;
    Ok(fs::metadata(a)?.dev() == fs::metadata(b)?.dev())
}

#[cfg(windows)]
fn same_device(a: &Path, b: &Path) -> Result<bool> {
    let a = fs::canonicalize(a)?;
    let b = fs::canonicalize(b)?;
    Ok(a.components().next() == b.components().next())
}

#[cfg(not(any(unix, windows)))]
fn same_device(_a: &Path, _b: &Path) -> Result<bool> {
    Ok(true)
}

/// Probe one source directory against the output root.
pub fn check(source_dir: &Path, target_dir: &Path) -> CheckResult {
    let name = format!("hardlink {}", source_dir.display());
    match probe(source_dir, target_dir) {
        Ok(true) => CheckResult::ok(&name, "same filesystem as output"),
        Ok(false) => CheckResult::fail(
            &name,
            "different filesystem from output",
            "Choose an output directory on the same disk as the source files",
        ),
        Err(e) => CheckResult::fail(&name, &e.to_string(), "Check that both paths are accessible"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_same_tempdir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let source = temp_dir.path().join("in");
        fs::create_dir(&source).unwrap();
        let target = temp_dir.path().join("out/library");

        assert!(probe(&source, &target).unwrap());
        assert!(target.is_dir());
    }

    #[test]
    fn test_probe_missing_source() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = probe(&temp_dir.path().join("missing"), temp_dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_check_reports_failure_for_missing_source() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = check(&temp_dir.path().join("missing"), temp_dir.path());
        assert!(!result.success);
        assert!(result.hint.is_some());
    }
}
