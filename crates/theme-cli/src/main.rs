//! Theme Schema CLI
//!
//! Keeps the `{% schema %}` blocks of theme sections in sync with shared
//! schema templates.

mod cli;
mod commands;
mod context;
mod error;
mod logging;

use std::time::Duration;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::ThemeContext;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_level())
        .map_err(|e| CliError::user(format!("Failed to initialize logging: {e}")))?;

    let cwd = std::env::current_dir()?;
    let context = ThemeContext::from_cli(&cli, &cwd);
    tracing::debug!(root = %context.root, "Resolved theme root");

    match cli.command {
        Some(cmd) => execute_command(cmd, &context),
        None => {
            println!("{} Theme schema template sync", "theme-schema".green().bold());
            println!();
            println!("Run {} for available commands.", "theme-schema --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, context: &ThemeContext) -> Result<()> {
    match cmd {
        Commands::Init => commands::run_init(context),
        Commands::Sync {
            path,
            dry_run,
            json,
        } => commands::run_sync(context, path.as_deref(), dry_run, json),
        Commands::Check { json } => commands::run_check(context, json),
        Commands::Watch { debounce_ms } => {
            commands::run_watch(context, Duration::from_millis(debounce_ms))
        }
    }
}
