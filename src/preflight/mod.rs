//! Preflight checks module.

mod anilist;
pub mod hardlink;

pub use hardlink::probe;

use colored::Colorize;
use std::path::{Path, PathBuf};

/// Result of a preflight check.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub success: bool,
    pub message: String,
    pub hint: Option<String>,
}

impl CheckResult {
    pub fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            message: message.to_string(),
            hint: None,
        }
    }

    pub fn fail(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }
}

/// Checks run before planning.
pub async fn run_plan_checks(online: bool) -> Vec<CheckResult> {
    let mut results = Vec::new();
    if online {
        results.push(anilist::check().await);
    }
    results
}

/// Checks run before applying: every source directory must be linkable
/// into the output root.
pub fn run_apply_checks(source_dirs: &[PathBuf], output_root: &Path) -> Vec<CheckResult> {
    source_dirs
        .iter()
        .map(|dir| hardlink::check(dir, output_root))
        .collect()
}

/// Print preflight check results.
pub fn print_results(results: &[CheckResult]) {
    for result in results {
        if result.success {
            println!(
                "{} {}: {}",
                "[OK]".green(),
                result.name.bold(),
                result.message
            );
        } else {
            println!(
                "{} {}: {}",
                "[FAIL]".red(),
                result.name.bold(),
                result.message
            );
            if let Some(ref hint) = result.hint {
                println!("  {} {}", "->".yellow(), hint);
            }
        }
    }
}

/// Check if all preflight checks passed.
pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(|r| r.success)
}
