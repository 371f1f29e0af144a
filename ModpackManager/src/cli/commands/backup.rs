//! CLI commands for save file backups

use std::time::Duration;

use console::{Term, style};

use crate::cli::confirm;
use crate::cli::progress::{CLOCK, DISK, print_step};
use crate::context::AppContext;

pub fn now(ctx: &AppContext) -> anyhow::Result<()> {
    let backups = ctx.save_backups()?;
    let path = backups.perform()?;
    println!("Backup created: {}", path.display());
    Ok(())
}

pub fn list(ctx: &AppContext) -> anyhow::Result<()> {
    let backups = ctx.save_backups()?;
    let names = backups.list()?;
    if names.is_empty() {
        println!("No backups in {}", backups.backup_dir().display());
        return Ok(());
    }
    println!("Backups in {}:", backups.backup_dir().display());
    for name in &names {
        println!("  {name}");
    }
    Ok(())
}

/// Restore a backup after confirmation
pub fn restore(ctx: &AppContext, name: &str, yes: bool) -> anyhow::Result<()> {
    let backups = ctx.save_backups()?;
    if !confirm(
        &format!("Overwrite {} with {name}?", backups.save_file().display()),
        yes,
    )? {
        println!("Restore cancelled.");
        return Ok(());
    }

    print_step(1, 1, DISK, &format!("Restoring {name}..."));
    if let Some(kept) = backups.restore(name)? {
        println!("Previous save kept as {}", kept.display());
    }
    println!("Backup {name} restored.");
    Ok(())
}

pub fn delete_all(ctx: &AppContext, yes: bool) -> anyhow::Result<()> {
    let backups = ctx.save_backups()?;
    if !confirm(
        &format!("Delete every backup in {}?", backups.backup_dir().display()),
        yes,
    )? {
        println!("Delete cancelled.");
        return Ok(());
    }
    let count = backups.delete_all()?;
    println!("Deleted {count} backups.");
    Ok(())
}

/// Back up on a timer until Enter is pressed
pub fn auto(ctx: &AppContext, interval: Option<u64>) -> anyhow::Result<()> {
    let seconds = interval.unwrap_or(ctx.settings().backup_interval).max(1);
    let backups = ctx.save_backups()?;

    print_step(
        1,
        1,
        CLOCK,
        &format!("Backing up {} every {seconds}s, press Enter to stop", backups.save_file().display()),
    );
    let mut timer = modpack_core::backup::AutoBackup::start(backups, Duration::from_secs(seconds), |outcome| {
        match outcome {
            Ok(path) => println!("  {} {}", style("saved").green(), path.display()),
            Err(e) => println!("  {} {e}", style("skipped").yellow()),
        }
    });

    Term::stdout().read_line()?;
    let made = timer.stop();
    println!("Auto backup stopped ({made} backups made).");
    Ok(())
}

pub fn open(ctx: &AppContext) -> anyhow::Result<()> {
    let backups = ctx.save_backups()?;
    backups.open_folder()?;
    println!("Opened {}", backups.backup_dir().display());
    Ok(())
}
