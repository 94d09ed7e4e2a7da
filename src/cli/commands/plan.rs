//! Plan command implementation.
//!
//! Coordinates scanning, parsing, AniList lookup and plan generation, then
//! saves the plan document for `apply`.

use super::search::print_candidates;
use crate::core::parser;
use crate::core::planner;
use crate::core::scanner;
use crate::core::session::Session;
use crate::models::config::Config;
use crate::models::media::{MetadataCandidate, SourceFile};
use crate::models::plan::{OrganizationPlan, PlanDocument};
use crate::services::AniListClient;
use crate::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Options of one `plan` invocation.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub sources: Vec<PathBuf>,
    pub target: Option<PathBuf>,
    pub query: Option<String>,
    /// 1-based index into the search results.
    pub pick: usize,
    pub offline: bool,
    pub video_template: Option<String>,
    pub renames: Vec<String>,
    pub output: Option<PathBuf>,
}

/// Execute the plan command.
pub async fn execute_plan(options: PlanOptions, config: &Config) -> Result<()> {
    println!("{}", "Planning anime organization...".bold().cyan());
    println!();

    let sources = options
        .sources
        .iter()
        .map(|s| absolute(s))
        .collect::<Result<Vec<_>>>()?;
    let output_root = options
        .target
        .clone()
        .unwrap_or_else(|| config.output_directory.clone());

    for source in &sources {
        println!("  {} {}", "Source:".bold(), source.display());
    }
    println!("  {} {}", "Target:".bold(), output_root.display());
    println!();

    let mut files = scanner::collect_sources(&sources)?;
    parser::annotate(&mut files);

    let candidate = if options.offline || !config.anilist_enabled {
        tracing::info!("Offline planning, no metadata lookup");
        None
    } else {
        lookup_candidate(&files, options.query.as_deref(), options.pick).await?
    };

    let mut naming = config.naming.clone();
    if let Some(ref template) = options.video_template {
        naming.video_template = template.clone();
    }

    let mut session = Session::with_candidate(files, candidate, naming)
        .with_override_policy(config.override_policy);

    for rename in &options.renames {
        let (source, name) = parse_rename(rename)?;
        let source = absolute(&source).unwrap_or(source);
        session.set_override(&source, name)?;
    }

    print_plan(session.plan());

    let document = PlanDocument::new(
        &output_root,
        session.candidate().cloned(),
        session.naming().clone(),
        session.plan().clone(),
    );

    let output_path = match options.output {
        Some(o) => o,
        None => {
            std::fs::create_dir_all(&output_root)?;
            planner::default_plan_path(&output_root)
        }
    };
    planner::save_plan(&document, &output_path)?;

    println!();
    println!(
        "{} {}",
        "[OK] Plan saved to:".bold().green(),
        output_path.display()
    );
    println!();
    println!("{}", "[Next Steps]".bold().yellow());
    println!(
        "  1. Review the plan: {}",
        format!("cat {}", output_path.display()).cyan()
    );
    println!(
        "  2. Apply the plan: {}",
        format!("anime-organizer apply {}", output_path.display()).cyan()
    );

    Ok(())
}

/// Search AniList and pick one candidate.
///
/// Zero results is not an error: files are planned without metadata.
async fn lookup_candidate(
    files: &[SourceFile],
    query: Option<&str>,
    pick: usize,
) -> Result<Option<MetadataCandidate>> {
    let query = match query.map(str::to_string).or_else(|| default_query(files)) {
        Some(q) => q,
        None => {
            tracing::warn!("No search query given and no title could be parsed");
            return Ok(None);
        }
    };

    println!("  {} {}", "Query:".bold(), query);
    let client = AniListClient::new()?;
    let candidates = client.search(&query).await?;

    if candidates.is_empty() {
        println!("  {}", "No AniList results, planning without metadata".yellow());
        return Ok(None);
    }

    print_candidates(&candidates);
    let candidate = pick_candidate(candidates, pick)?;
    println!();
    println!(
        "  {} {}",
        "Selected:".bold(),
        candidate.title.preferred(true).unwrap_or("(untitled)").green()
    );
    println!();
    Ok(Some(candidate))
}

/// Title parsed from the first video, in name order.
fn default_query(files: &[SourceFile]) -> Option<String> {
    let mut ordered: Vec<&SourceFile> = files.iter().filter(|f| f.is_video()).collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));
    ordered.extend(files.iter().filter(|f| f.is_subtitle()));

    let title = ordered
        .iter()
        .find_map(|f| f.hint.as_ref().and_then(|h| h.title.clone()));
    title
}

fn pick_candidate(candidates: Vec<MetadataCandidate>, pick: usize) -> Result<MetadataCandidate> {
    let available = candidates.len();
    if pick == 0 || pick > available {
        return Err(crate::Error::CandidateOutOfRange {
            index: pick,
            available,
        });
    }
    candidates
        .into_iter()
        .nth(pick - 1)
        .ok_or(crate::Error::CandidateOutOfRange {
            index: pick,
            available,
        })
}

/// Split a `SOURCE=NAME` rename argument.
fn parse_rename(arg: &str) -> Result<(PathBuf, String)> {
    match arg.split_once('=') {
        Some((source, name)) if !source.trim().is_empty() && !name.trim().is_empty() => {
            Ok((PathBuf::from(source.trim()), name.trim().to_string()))
        }
        _ => Err(crate::Error::other(format!(
            "invalid rename '{}', expected SOURCE=NAME",
            arg
        ))),
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    Ok(std::fs::canonicalize(path)?)
}

fn print_plan(plan: &OrganizationPlan) {
    println!("{}", "[Plan]".bold().green());
    for entry in &plan.entries {
        let marker = if entry.name_override.is_some() { "*" } else { " " };
        println!(
            " {}{} {} {}",
            marker,
            entry
                .source
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .dimmed(),
            "->".cyan(),
            entry.effective_destination().display()
        );
    }

    println!();
    println!("  {} {}", "Files to link:".bold(), plan.entries.len());
    println!("  {} {}", "Skipped:".bold(), plan.skipped.len());

    let duplicates = plan.duplicate_destinations();
    if !duplicates.is_empty() {
        println!();
        println!("{}", "[WARNING] Several files share a destination:".bold().yellow());
        for (destination, sources) in duplicates {
            println!("  {}", destination.display().to_string().red());
            for source in sources {
                println!("    <- {}", source.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rename() {
        let (source, name) = parse_rename("/in/a.mkv=Custom - 01.mkv").unwrap();
        assert_eq!(source, PathBuf::from("/in/a.mkv"));
        assert_eq!(name, "Custom - 01.mkv");
        assert!(parse_rename("/in/a.mkv").is_err());
        assert!(parse_rename("=name.mkv").is_err());
    }

    #[test]
    fn test_pick_candidate_bounds() {
        let candidates = vec![MetadataCandidate::default(), MetadataCandidate::default()];
        assert!(pick_candidate(candidates.clone(), 2).is_ok());
        assert!(matches!(
            pick_candidate(candidates.clone(), 3),
            Err(crate::Error::CandidateOutOfRange { index: 3, available: 2 })
        ));
        assert!(pick_candidate(candidates, 0).is_err());
    }

    #[test]
    fn test_default_query_prefers_first_video() {
        let mut files = vec![
            SourceFile::new("/in/[G] Show B - 02.mkv", 1),
            SourceFile::new("/in/[G] Show A - 01.mkv", 1),
        ];
        parser::annotate(&mut files);
        assert_eq!(default_query(&files).as_deref(), Some("Show A"));
    }
}
