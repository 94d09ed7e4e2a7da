//! Config command implementation.

use crate::cli::args::ConfigAction;
use crate::models::config::{self, Config};
use crate::Result;
use colored::Colorize;

/// Execute config command.
pub fn execute_config(action: &ConfigAction) -> Result<()> {
    let path = config::config_path();

    match action {
        ConfigAction::Show => {
            let config = config::load_config();
            println!("{} {}", "# Config file:".dimmed(), path.display());
            if !path.exists() {
                println!("{}", "# (not found, showing defaults)".dimmed());
            }
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            config::save_config(&Config::default(), &path)?;
            println!(
                "{} {}",
                "[OK] Default configuration written to:".bold().green(),
                path.display()
            );
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
