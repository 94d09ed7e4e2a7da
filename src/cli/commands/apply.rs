//! Apply command implementation.
//!
//! Reads a plan.json file and hard-links every planned file into the
//! library.

use crate::core::materializer::{self, MaterializeRequest, Materializer};
use crate::core::planner;
use crate::models::config::{Config, ConflictStrategy};
use crate::models::process::ProcessResult;
use crate::preflight;
use crate::Result;
use colored::Colorize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Options of one `apply` invocation.
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub plan_file: PathBuf,
    pub target: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub conflict: Option<ConflictStrategy>,
    pub season_template: Option<String>,
    pub dry_run: bool,
    pub skip_preflight: bool,
}

/// Execute the apply command.
pub async fn execute_apply(options: ApplyOptions, config: &Config) -> Result<ProcessResult> {
    println!("{}", "[APPLY] Applying plan...".bold().cyan());
    println!();

    println!("[INFO] Loading plan: {}", options.plan_file.display());
    let document = planner::load_plan(&options.plan_file)?;

    let output_root = options
        .target
        .clone()
        .unwrap_or_else(|| document.output_root.clone());
    let conflict = options.conflict.unwrap_or(config.conflict_strategy);

    println!("  {} {}", "Plan:".bold(), document.id);
    println!("  {} {}", "Created:".bold(), document.created_at);
    println!("  {} {}", "Target:".bold(), output_root.display());
    println!("  {} {}", "Files:".bold(), document.plan.entries.len());
    println!("  {} {:?}", "Conflicts:".bold(), conflict);
    println!();

    let mut request = MaterializeRequest::new(&output_root, document.plan.destination_map())
        .with_conflict_strategy(conflict)
        .with_concurrency(options.concurrency.unwrap_or_else(|| config.effective_concurrency()));
    if let Some(ref template) = options.season_template {
        request = request.with_season_folder_template(template.clone());
    }

    if options.dry_run {
        print_dry_run(&request);
        return Ok(ProcessResult::from_outcomes(Vec::new(), Vec::new()));
    }

    if !options.skip_preflight {
        let source_dirs = source_directories(request.destinations.keys());
        let results = preflight::run_apply_checks(&source_dirs, &output_root);
        preflight::print_results(&results);
        println!();
        if !preflight::all_passed(&results) {
            return Err(crate::Error::MaterializeError(
                "preflight checks failed".to_string(),
            ));
        }
    }

    let result = Materializer::new().with_progress(true).apply(&request).await;
    print_summary(&result);

    if !result.success {
        return Err(crate::Error::MaterializeError(result.message.clone()));
    }
    Ok(result)
}

/// Distinct parent directories of the given sources.
fn source_directories<'a>(sources: impl Iterator<Item = &'a PathBuf>) -> Vec<PathBuf> {
    sources
        .filter_map(|s| s.parent().map(Path::to_path_buf))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn print_dry_run(request: &MaterializeRequest) {
    println!("{}", "[DRY RUN] Nothing will be linked".bold().yellow());
    for (source, destination) in &request.destinations {
        match materializer::target_path(destination, request) {
            Ok(target) => println!("  {} -> {}", source.display(), target.display()),
            Err(e) => println!("  {} {}: {}", "[FAIL]".red(), source.display(), e),
        }
    }
}

fn print_summary(result: &ProcessResult) {
    println!();
    println!("{}", "[Apply Summary]".bold().green());
    println!("  {} {}", "Linked:".bold(), result.processed_files.len());
    println!("  {} {}", "Failed:".bold(), result.failed_files.len());

    if result.has_failures() {
        println!();
        println!("{}", "[Failed Files]".bold().red());
        for failure in &result.failed_files {
            println!("  {} - {}", failure.path.display(), failure.error);
        }
        println!();
        println!(
            "  {}",
            "Fix the issues above, then rerun apply with --conflict skip".yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_directories_are_distinct() {
        let sources = vec![
            PathBuf::from("/in/a/1.mkv"),
            PathBuf::from("/in/a/2.mkv"),
            PathBuf::from("/in/b/1.ass"),
        ];
        assert_eq!(
            source_directories(sources.iter()),
            vec![PathBuf::from("/in/a"), PathBuf::from("/in/b")]
        );
    }
}
