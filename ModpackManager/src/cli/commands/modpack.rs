//! CLI commands for the registry, downloads and installs

use std::time::Instant;

use console::style;
use modpack_core::fetch::FetchProgress;
use modpack_core::install::{InstallProgress, InstallReport};
use modpack_core::versions::{self, UpdateStatus};

use super::definitions::ModpackArgs;
use crate::cli::confirm;
use crate::cli::progress::{FetchDisplay, GEAR, InstallDisplay, LOOKING_GLASS, PACKAGE, TRUCK, print_done, print_step};
use crate::context::AppContext;
use crate::operations::{self, DownloadOutcome};

/// List registry modpacks by category
pub fn list(ctx: &mut AppContext, refresh: bool) -> anyhow::Result<()> {
    if refresh {
        let origin = ctx.refresh_registry();
        println!("Registry loaded from {}", origin.as_str());
    }

    let registry = ctx.registry();
    let default = &ctx.settings().default_modpack;
    for category in registry.categories() {
        println!("{}", style(&category.category).bold());
        for entry in &category.modpacks {
            let marker = if &entry.name == default { "*" } else { " " };
            let downloaded = if ctx.modpack_dir(&entry.name, modpack_core::registry::DEFAULT_BRANCH).is_dir() {
                style("downloaded").green().to_string()
            } else {
                String::new()
            };
            println!("{marker} {:<28} {downloaded}", entry.name);
            if !entry.description.is_empty() {
                println!("    {}", style(&entry.description).dim());
            }
            let branches = entry.branches();
            if branches.len() > 1 {
                println!("    branches: {}", branches.join(", "));
            }
        }
    }
    Ok(())
}

/// Show installed modpack and paths
pub fn info(ctx: &AppContext) -> anyhow::Result<()> {
    let settings = ctx.settings();
    println!("{}", operations::installed_info(ctx).summary());
    println!();
    println!("Profile:        {}", settings.profile_name);
    println!("Game directory: {}", settings.game_dir().display());
    println!("Mods directory: {}", settings.mods_dir().display());
    println!("Modpacks:       {}", ctx.paths().modpacks_dir.display());
    println!("Settings:       {}", ctx.paths().settings_dir.display());
    Ok(())
}

/// Download one modpack
pub fn download(ctx: &AppContext, target: &ModpackArgs, force: bool) -> anyhow::Result<()> {
    let name = ctx.modpack_name(target.modpack.as_deref())?;
    let start = Instant::now();
    print_step(1, 1, PACKAGE, &format!("Downloading {name} ({})...", target.branch));

    let fetch = FetchDisplay::new(name);
    let install = InstallDisplay::new();
    let result = operations::download_modpack(
        ctx,
        name,
        &target.branch,
        force,
        &|p: &FetchProgress| fetch.update(p),
        &|p: &InstallProgress| install.update(p),
    );
    fetch.finish();
    install.finish();

    report_download(name, &result?);
    print_done(start.elapsed());
    Ok(())
}

/// Update one modpack
pub fn update(ctx: &AppContext, target: &ModpackArgs) -> anyhow::Result<()> {
    let name = ctx.modpack_name(target.modpack.as_deref())?;
    let start = Instant::now();
    print_step(1, 1, PACKAGE, &format!("Updating {name} ({})...", target.branch));

    let fetch = FetchDisplay::new(name);
    let install = InstallDisplay::new();
    let result = operations::update_modpack(
        ctx,
        name,
        &target.branch,
        &|p: &FetchProgress| fetch.update(p),
        &|p: &InstallProgress| install.update(p),
    );
    fetch.finish();
    install.finish();

    report_download(name, &result?);
    print_done(start.elapsed());
    Ok(())
}

/// Download every registry modpack
pub fn download_all(ctx: &AppContext, force: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let fetch = FetchDisplay::new("batch");
    let result = operations::download_all(
        ctx,
        force,
        &|index, total, name| {
            fetch.suspend(|| print_step(index, total, TRUCK, &format!("Downloading {name}...")));
        },
        &|p: &FetchProgress| fetch.update(p),
    );
    fetch.finish();
    let result = result?;

    println!();
    println!("Download complete:");
    println!("  Success: {}", result.success_count);
    println!("  Failed: {}", result.fail_count);
    if result.cancelled {
        println!("  Cancelled before finishing");
    }
    if result.fail_count > 0 {
        println!();
        for line in result.results.iter().filter(|r| r.starts_with("Failed")) {
            println!("  {}", style(line).red());
        }
    }
    print_done(start.elapsed());
    Ok(())
}

/// Check a download for empty mod folders
pub fn verify(ctx: &AppContext, target: &ModpackArgs) -> anyhow::Result<()> {
    let name = ctx.modpack_name(target.modpack.as_deref())?;
    print_step(1, 1, LOOKING_GLASS, &format!("Verifying {name}..."));

    let report = operations::verify(ctx, name, &target.branch)?;
    if report.is_ok() {
        println!("All {} mod folders are populated.", report.checked);
    } else {
        println!(
            "{} of {} mod folders are empty (failed submodule downloads):",
            report.broken.len(),
            report.checked
        );
        for mod_name in &report.broken {
            println!("  {}", style(mod_name).yellow());
        }
        println!();
        println!("Run `modpack-manager update` or `download --force` to fix them.");
    }
    Ok(())
}

/// Install a downloaded modpack
pub fn install(ctx: &AppContext, target: &ModpackArgs) -> anyhow::Result<()> {
    let name = ctx.modpack_name(target.modpack.as_deref())?;
    let start = Instant::now();
    print_step(1, 1, GEAR, &format!("Installing {name}..."));

    let display = InstallDisplay::new();
    let result = operations::install_modpack(ctx, name, &target.branch, &|p: &InstallProgress| display.update(p));
    display.finish();

    report_install(&result?);
    print_done(start.elapsed());
    Ok(())
}

/// Delete the mods directory after confirmation
pub fn uninstall(ctx: &AppContext, yes: bool) -> anyhow::Result<()> {
    let mods_dir = ctx.settings().mods_dir();
    if !confirm(
        &format!("Delete {} and everything in it?", mods_dir.display()),
        yes,
    )? {
        println!("Uninstall cancelled.");
        return Ok(());
    }
    operations::uninstall_modpack(ctx)?;
    println!("Modpack uninstalled successfully.");
    Ok(())
}

/// Latest version of each Git modpack
pub fn versions(ctx: &AppContext) -> anyhow::Result<()> {
    let results = versions::registry_versions(ctx.http(), ctx.registry());
    if results.is_empty() {
        println!("No Git modpacks hosted on GitHub in the registry.");
        return Ok(());
    }
    let width = results.iter().map(|r| r.name.len()).max().unwrap_or(0);
    for version in &results {
        println!("{:<width$}  {}", version.name, version.display());
    }
    Ok(())
}

/// Compare the manager version with the registry
pub fn check_update(ctx: &AppContext) -> anyhow::Result<()> {
    match versions::check_manager_update(ctx.registry().manifest(), env!("CARGO_PKG_VERSION"))? {
        UpdateStatus::UpToDate { current } => println!("Modpack Manager {current} is up to date."),
        UpdateStatus::Available {
            current,
            latest,
            download_url,
            changelog,
        } => {
            println!("A new version ({latest}) is available (running {current}).");
            if let Some(changelog) = changelog {
                println!();
                println!("Changelog:");
                println!("{changelog}");
            }
            if let Some(url) = download_url {
                println!();
                println!("Download: {url}");
            }
        }
        UpdateStatus::Unknown => println!("Could not fetch the latest version information."),
    }
    Ok(())
}

fn report_download(name: &str, outcome: &DownloadOutcome) {
    println!("Downloaded {name} to {}", outcome.path.display());
    if let Some(report) = &outcome.installed {
        report_install(report);
    }
}

fn report_install(report: &InstallReport) {
    if let Some(backup) = &report.backup {
        println!("Previous mods moved to {}", backup.display());
    }
    println!(
        "Installed {} mods to {} ({} excluded)",
        report.installed.len(),
        report.mods_dir.display(),
        report.skipped.len()
    );
    if !report.removed_debug.is_empty() {
        println!("Removed debug folders: {}", report.removed_debug.join(", "));
    }
}
