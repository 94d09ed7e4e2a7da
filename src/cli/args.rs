//! Command line argument definitions.

use crate::models::config::ConflictStrategy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Anime Organizer - Hardlink anime episodes and subtitles into a clean library
#[derive(Parser, Debug)]
#[command(name = "anime-organizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan sources and generate an organization plan
    Plan {
        /// Source directories or individual files
        #[arg(value_name = "SOURCE", required = true)]
        sources: Vec<PathBuf>,

        /// Library root (default: output_directory from config)
        #[arg(short, long, value_name = "TARGET")]
        target: Option<PathBuf>,

        /// AniList search query (default: title parsed from the first video)
        #[arg(short, long)]
        query: Option<String>,

        /// Which search result to use, starting at 1
        #[arg(short, long, default_value_t = 1)]
        pick: usize,

        /// Plan without querying AniList
        #[arg(long)]
        offline: bool,

        /// Video file name template
        #[arg(long, value_name = "TEMPLATE")]
        video_template: Option<String>,

        /// Manual file name for a source, as SOURCE=NAME (repeatable)
        #[arg(long = "rename", value_name = "SOURCE=NAME")]
        renames: Vec<String>,

        /// Output path for plan.json
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Search AniList for a title
    Search {
        /// Title to search for
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Create the hard links described by a plan file
    Apply {
        /// Path to the plan.json file
        #[arg(value_name = "PLAN_FILE")]
        plan_file: PathBuf,

        /// Library root (default: the one stored in the plan)
        #[arg(short, long, value_name = "TARGET")]
        target: Option<PathBuf>,

        /// Concurrent link operations (1-10)
        #[arg(short = 'j', long)]
        concurrency: Option<usize>,

        /// What to do with existing targets: fail, skip, overwrite, rename
        #[arg(long)]
        conflict: Option<ConflictStrategy>,

        /// Re-render season folders with this template (e.g. "S{season:02}")
        #[arg(long, value_name = "TEMPLATE")]
        season_template: Option<String>,

        /// Show what would be linked without touching the filesystem
        #[arg(long)]
        dry_run: bool,
    },

    /// Render a naming template with sample values
    Preview {
        /// Template to render
        #[arg(value_name = "TEMPLATE")]
        template: String,

        #[arg(long, default_value = "Sousou no Frieren")]
        title: String,

        #[arg(long, default_value_t = 1)]
        episode: u32,

        #[arg(long, default_value_t = 1)]
        season: u32,

        #[arg(long)]
        group: Option<String>,

        #[arg(long)]
        year: Option<u32>,

        #[arg(long, default_value = "mkv")]
        ext: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write the default configuration
    Reset,

    /// Print the configuration file path
    Path,
}
