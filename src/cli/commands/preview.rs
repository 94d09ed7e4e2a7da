//! Preview command implementation.

use crate::generators::template::{resolve, PlaceholderValues};
use crate::Result;
use colored::Colorize;

/// Sample values for the preview command.
#[derive(Debug, Clone)]
pub struct PreviewArgs {
    pub template: String,
    pub title: String,
    pub episode: u32,
    pub season: u32,
    pub group: Option<String>,
    pub year: Option<u32>,
    pub ext: String,
}

/// Render a template against sample values.
pub fn render(args: &PreviewArgs) -> String {
    let values = PlaceholderValues {
        title: Some(args.title.clone()),
        title_romaji: Some(args.title.clone()),
        title_english: None,
        episode: Some(args.episode),
        season: Some(args.season),
        year: args.year,
        group: args.group.clone(),
        ext: Some(args.ext.trim_start_matches('.').to_string()),
    };
    resolve(&args.template, &values)
}

/// Execute preview command.
pub fn execute_preview(args: &PreviewArgs) -> Result<()> {
    println!("  {} {}", "Template:".bold(), args.template);
    println!("  {} {}", "Result:".bold(), render(args).green());
    Ok(())
}
