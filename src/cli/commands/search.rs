//! Search command implementation.

use crate::models::media::MetadataCandidate;
use crate::services::AniListClient;
use crate::Result;
use colored::Colorize;

/// Execute search command.
pub async fn execute_search(query: &str) -> Result<()> {
    let client = AniListClient::new()?;
    let candidates = client.search(query).await?;

    if candidates.is_empty() {
        println!("{} {}", "No results for".yellow(), query.bold());
        return Ok(());
    }

    println!("{}", format!("Results for \"{}\"", query).bold().cyan());
    print_candidates(&candidates);
    println!();
    println!(
        "  Use one with: {}",
        format!("anime-organizer plan <SOURCE> --query \"{}\" --pick <N>", query).cyan()
    );

    Ok(())
}

/// Print candidates as a numbered list, starting at 1.
pub fn print_candidates(candidates: &[MetadataCandidate]) {
    for (index, candidate) in candidates.iter().enumerate() {
        let title = candidate
            .title
            .preferred(true)
            .unwrap_or("(untitled)");
        let year = candidate
            .season_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "????".to_string());
        let format = candidate.format.as_deref().unwrap_or("-");
        let episodes = candidate
            .episodes
            .map(|e| format!("{} eps", e))
            .unwrap_or_else(|| "? eps".to_string());

        println!(
            "  {:>2}. {} ({}) {} {} {}",
            index + 1,
            title.bold(),
            year,
            format.dimmed(),
            episodes.dimmed(),
            format!("#{}", candidate.id).dimmed()
        );
        if let Some(ref english) = candidate.title.english {
            if Some(english.as_str()) != candidate.title.romaji.as_deref() {
                println!("      {}", english);
            }
        }
    }
}
