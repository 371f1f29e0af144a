//! Installing, uninstalling and checking downloaded modpacks

use modpack_core::fetch::{IntegrityReport, verify_modpack};
use modpack_core::install::{self, InstallOptions, InstallProgressCallback, InstallReport, InstalledInfo};
use modpack_core::selection::load_excluded;

use crate::context::AppContext;
use crate::error::Result;

/// Install a downloaded modpack into the configured mods directory.
///
/// The saved excluded list is honoured unless `skip_mod_selection` is set,
/// in which case every mod is installed.
pub fn install_modpack(
    ctx: &AppContext,
    modpack: &str,
    branch: &str,
    progress: InstallProgressCallback,
) -> Result<InstallReport> {
    let _guard = ctx.begin_operation()?;
    install_unguarded(ctx, modpack, branch, progress)
}

pub(crate) fn install_unguarded(
    ctx: &AppContext,
    modpack: &str,
    branch: &str,
    progress: InstallProgressCallback,
) -> Result<InstallReport> {
    let modpack_dir = ctx.modpack_dir(modpack, branch);
    if !modpack_dir.is_dir() {
        return Err(modpack_core::Error::ModpackNotDownloaded { path: modpack_dir }.into());
    }

    let settings = ctx.settings();
    let excluded = if settings.skip_mod_selection {
        Vec::new()
    } else {
        load_excluded(&ctx.paths().excluded_mods_file())?
    };
    let options = InstallOptions::from(settings).with_cancel(ctx.cancel_flag());

    let report = install::install_modpack(&modpack_dir, &settings.mods_dir(), &excluded, &options, progress)?;
    tracing::info!(
        "Installed {modpack} ({} mods, {} skipped)",
        report.installed.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Delete the configured mods directory.
pub fn uninstall_modpack(ctx: &AppContext) -> Result<()> {
    let _guard = ctx.begin_operation()?;
    install::uninstall(&ctx.settings().mods_dir())?;
    Ok(())
}

/// Check a downloaded modpack for empty mod folders.
pub fn verify(ctx: &AppContext, modpack: &str, branch: &str) -> Result<IntegrityReport> {
    let modpack_dir = ctx.modpack_dir(modpack, branch);
    if !modpack_dir.is_dir() {
        return Err(modpack_core::Error::ModpackNotDownloaded { path: modpack_dir }.into());
    }
    Ok(verify_modpack(&modpack_dir)?)
}

/// Name and version of what is currently installed.
pub fn installed_info(ctx: &AppContext) -> InstalledInfo {
    install::read_installed_info(&ctx.settings().mods_dir())
}
