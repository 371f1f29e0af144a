//! ModpackManager CLI - Command-line front-end for the modpack manager

pub mod commands;
pub mod progress;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use console::Term;
use modpack_core::settings::ManagerPaths;
use tracing_subscriber::EnvFilter;

use crate::context::{AppContext, ContextOptions};

#[derive(Parser)]
#[command(name = "modpack-manager", version)]
#[command(about = "Modpack Manager: download, pick and install Balatro modpacks", long_about = None)]
struct Cli {
    /// Folder for settings, excluded mods, presets and the registry cache
    #[arg(long, global = true)]
    settings_dir: Option<PathBuf>,

    /// Folder modpacks are downloaded into
    #[arg(long, global = true)]
    modpacks_dir: Option<PathBuf>,

    /// Use the cached registry instead of fetching it
    #[arg(long, global = true)]
    offline: bool,

    /// Answer yes to confirmation prompts
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Run the ModpackManager CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let paths = match (cli.settings_dir, cli.modpacks_dir) {
        (Some(settings_dir), Some(modpacks_dir)) => ManagerPaths::new(settings_dir, modpacks_dir),
        (settings_dir, modpacks_dir) => {
            let defaults = ManagerPaths::platform_default()?;
            ManagerPaths::new(
                settings_dir.unwrap_or(defaults.settings_dir),
                modpacks_dir.unwrap_or(defaults.modpacks_dir),
            )
        }
    };
    let options = ContextOptions {
        offline: cli.offline || !cli.command.needs_registry(),
        ..ContextOptions::default()
    };

    let mut ctx = AppContext::new(paths, &options)?;
    cli.command.execute(&mut ctx, cli.yes)?;

    Ok(())
}

/// Ask a yes/no question on the terminal, defaulting to no.
///
/// Returns `true` straight away when `assume_yes` is set.
pub fn confirm(question: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let term = Term::stdout();
    if !term.is_term() {
        println!("{question} [y/N] (no terminal, use --yes to confirm)");
        return Ok(false);
    }
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
