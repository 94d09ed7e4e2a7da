//! Anime Organizer CLI
//!
//! A command-line tool for hard-linking anime episodes and subtitles into a
//! templated library layout, with metadata from AniList.

use anime_organizer::cli::{
    args::{Cli, Commands},
    commands::{apply, config, plan, preview, search},
};
use anime_organizer::models::config::load_config;
use anime_organizer::preflight;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let app_config = load_config();

    // Initialize logging
    init_logging(cli.verbose, &app_config.log_level);

    // Run the appropriate command
    match cli.command {
        Commands::Plan {
            sources,
            target,
            query,
            pick,
            offline,
            video_template,
            renames,
            output,
        } => {
            let online = !offline && app_config.anilist_enabled;
            if online && !cli.skip_preflight {
                run_preflight_checks(online).await?;
            }

            let options = plan::PlanOptions {
                sources,
                target,
                query,
                pick,
                offline,
                video_template,
                renames,
                output,
            };
            plan::execute_plan(options, &app_config).await?;
        }

        Commands::Search { query } => {
            search::execute_search(&query).await?;
        }

        Commands::Apply {
            plan_file,
            target,
            concurrency,
            conflict,
            season_template,
            dry_run,
        } => {
            let options = apply::ApplyOptions {
                plan_file,
                target,
                concurrency,
                conflict,
                season_template,
                dry_run,
                skip_preflight: cli.skip_preflight,
            };
            apply::execute_apply(options, &app_config).await?;
        }

        Commands::Preview {
            template,
            title,
            episode,
            season,
            group,
            year,
            ext,
        } => {
            preview::execute_preview(&preview::PreviewArgs {
                template,
                title,
                episode,
                season,
                group,
                year,
                ext,
            })?;
        }

        Commands::Config { action } => {
            config::execute_config(&action)?;
        }
    }

    Ok(())
}

/// Initialize the logging system.
///
/// `--verbose` forces debug output; otherwise the configured level is used.
/// `RUST_LOG` overrides both.
fn init_logging(verbose: bool, log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if verbose { "debug" } else { log_level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("anime_organizer={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and exit if any fail.
async fn run_preflight_checks(online: bool) -> anyhow::Result<()> {
    use colored::Colorize;

    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_plan_checks(online).await;
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        anyhow::bail!("Preflight checks failed. Fix the issues above or use --offline.");
    }

    Ok(())
}
