//! Installing a downloaded modpack into the game's mods directory
//!
//! The modpack's `Mods` folder is copied mod by mod, skipping the user's
//! excluded mods. The loader and utility mod are always installed.

mod info;

pub use info::{InstalledInfo, read_installed_info};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::utils::fs::{copy_dir_all, remove_dir_all_force, timestamp, unique_path};

/// Mods installed regardless of the excluded list.
pub const MANDATORY_MODS: [&str; 2] = ["Steamodded", "ModpackUtil"];

/// Name of the modpack subfolder holding the mods.
pub const MODS_FOLDER: &str = "Mods";

/// A folder holding this file (other than the loader) is a leftover debug
/// tool and is removed after install.
pub const DEBUG_MARKER: &str = "tk_debug_window.py";
const DEBUG_MARKER_OWNER: &str = "Steamodded";

// ============================================================================
// Progress Types
// ============================================================================

/// Progress callback type for install operations
pub type InstallProgressCallback<'a> = &'a (dyn Fn(&InstallProgress) + Sync + Send);

/// Progress information during install
#[derive(Debug, Clone)]
pub struct InstallProgress {
    /// Current operation phase
    pub phase: InstallPhase,
    /// Current item number (1-indexed)
    pub current: usize,
    /// Total number of items
    pub total: usize,
    /// Mod currently being copied (if applicable)
    pub current_file: Option<String>,
}

impl InstallProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: InstallPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: None,
        }
    }

    /// Create a progress update with a mod name
    #[must_use]
    pub fn with_file(phase: InstallPhase, current: usize, total: usize, file: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            current_file: Some(file.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

/// Phase of an install
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPhase {
    /// Moving the old mods directory aside
    BackingUp,
    /// Deleting the old mods directory
    Removing,
    /// Copying mods
    Copying,
    /// Removing debug leftovers
    Cleaning,
    /// Operation complete
    Complete,
}

impl InstallPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BackingUp => "Backing up Mods folder",
            Self::Removing => "Removing Mods folder",
            Self::Copying => "Copying mod",
            Self::Cleaning => "Removing debug folders",
            Self::Complete => "Complete",
        }
    }
}

// ============================================================================
// Options and results
// ============================================================================

/// What to do with the existing mods directory, and how to cancel.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Move the existing mods directory to `Mods-backup-<timestamp>` first.
    pub backup_existing: bool,
    /// Delete the existing mods directory first.
    pub remove_existing: bool,
    /// Checked before each mod is copied.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl InstallOptions {
    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

impl From<&Settings> for InstallOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            backup_existing: settings.backup_mods,
            remove_existing: settings.remove_mods,
            cancel: None,
        }
    }
}

/// Result of an install
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub mods_dir: PathBuf,
    /// Mods copied, sorted
    pub installed: Vec<String>,
    /// Mods skipped because they were excluded, sorted
    pub skipped: Vec<String>,
    /// Where the previous mods directory was moved to
    pub backup: Option<PathBuf>,
    /// Debug folders removed after copying
    pub removed_debug: Vec<String>,
}

// ============================================================================
// Operations
// ============================================================================

/// Mod folder names under `<modpack>/Mods`, sorted.
pub fn list_mods(modpack_dir: &Path) -> Result<Vec<String>> {
    let source = modpack_dir.join(MODS_FOLDER);
    if !source.is_dir() {
        return Err(Error::ModsFolderMissing { path: source });
    }

    let mut mods: Vec<String> = WalkDir::new(&source)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    mods.sort();
    Ok(mods)
}

/// Whether a mod is always installed.
pub fn is_mandatory(name: &str) -> bool {
    MANDATORY_MODS.contains(&name)
}

/// Split available mods into `(install, skip)`.
///
/// Mandatory mods are installed even when excluded.
pub fn partition_mods(available: &[String], excluded: &[String]) -> (Vec<String>, Vec<String>) {
    available
        .iter()
        .cloned()
        .partition(|m| is_mandatory(m) || !excluded.contains(m))
}

/// Install a downloaded modpack.
///
/// # Arguments
/// * `modpack_dir` - Downloaded modpack folder (containing `Mods`)
/// * `mods_dir` - The game's mods directory
/// * `excluded` - Mods to skip
/// * `options` - Backup/removal policy and cancellation
/// * `progress` - Called before each mod is copied
///
/// # Returns
/// What was installed, skipped, backed up and cleaned.
pub fn install_modpack(
    modpack_dir: &Path,
    mods_dir: &Path,
    excluded: &[String],
    options: &InstallOptions,
    progress: InstallProgressCallback,
) -> Result<InstallReport> {
    let source = modpack_dir.join(MODS_FOLDER);
    let available = list_mods(modpack_dir)?;
    let (to_install, skipped) = partition_mods(&available, excluded);

    for name in MANDATORY_MODS {
        if !available.iter().any(|m| m == name) {
            tracing::warn!("Mandatory mod {name} is missing from {}", source.display());
        }
    }

    let mut report = InstallReport {
        mods_dir: mods_dir.to_path_buf(),
        skipped,
        ..InstallReport::default()
    };

    if mods_dir.is_dir() {
        if options.backup_existing {
            progress(&InstallProgress::new(InstallPhase::BackingUp, 0, 1));
            report.backup = backup_mods_directory(mods_dir)?;
        }
        if options.remove_existing && mods_dir.exists() {
            progress(&InstallProgress::new(InstallPhase::Removing, 0, 1));
            remove_dir_all_force(mods_dir)?;
            tracing::info!("Removed existing Mods folder {}", mods_dir.display());
        }
    }
    fs::create_dir_all(mods_dir)?;

    let copy_result = copy_mods(&source, mods_dir, &to_install, options, progress);

    progress(&InstallProgress::new(InstallPhase::Cleaning, 0, 1));
    match remove_debug_folders(mods_dir) {
        Ok(removed) => report.removed_debug = removed,
        Err(e) => tracing::warn!("Failed to remove debug folders: {e}"),
    }

    copy_result?;
    report.installed = to_install;

    progress(&InstallProgress::new(InstallPhase::Complete, 1, 1));
    tracing::info!(
        "Successfully installed modpack: {} mods, {} skipped",
        report.installed.len(),
        report.skipped.len()
    );
    Ok(report)
}

/// Copy the listed mods in parallel, replacing existing destinations.
fn copy_mods(
    source: &Path,
    mods_dir: &Path,
    mods: &[String],
    options: &InstallOptions,
    progress: InstallProgressCallback,
) -> Result<()> {
    let processed = AtomicUsize::new(0);
    let total = mods.len();

    mods.par_iter().try_for_each(|name| {
        if options.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
        progress(&InstallProgress::with_file(InstallPhase::Copying, current, total, name.as_str()));

        let destination = mods_dir.join(name);
        if destination.exists() {
            remove_dir_all_force(&destination)?;
        }
        copy_dir_all(&source.join(name), &destination)?;
        tracing::debug!("Copied mod {name}");
        Ok(())
    })
}

/// Move the mods directory to a timestamped sibling `Mods-backup-<ts>`
/// (`-1`, `-2`, ... appended when that name is taken).
///
/// # Returns
/// The backup location, or `None` if there was nothing to back up.
pub fn backup_mods_directory(mods_dir: &Path) -> Result<Option<PathBuf>> {
    if !mods_dir.is_dir() {
        return Ok(None);
    }
    let parent = mods_dir
        .parent()
        .ok_or_else(|| Error::InvalidPath(mods_dir.display().to_string()))?;
    let backup = unique_path(parent, &format!("Mods-backup-{}", timestamp()), "");

    if fs::rename(mods_dir, &backup).is_err() {
        // Different filesystem: copy then delete
        copy_dir_all(mods_dir, &backup)?;
        remove_dir_all_force(mods_dir)?;
    }
    tracing::info!("Backed up Mods folder to {}", backup.display());
    Ok(Some(backup))
}

/// Delete the mods directory.
///
/// The caller is responsible for confirming with the user first.
pub fn uninstall(mods_dir: &Path) -> Result<()> {
    if !mods_dir.exists() {
        return Err(Error::NothingToUninstall {
            path: mods_dir.to_path_buf(),
        });
    }
    remove_dir_all_force(mods_dir)?;
    tracing::info!("Modpack uninstalled from {}", mods_dir.display());
    Ok(())
}

/// Remove folders (other than the loader's) that contain the debug marker.
///
/// # Returns
/// Names of the removed folders.
pub fn remove_debug_folders(mods_dir: &Path) -> Result<Vec<String>> {
    if !mods_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut removed = Vec::new();
    for entry in fs::read_dir(mods_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let path = entry.path();
        if name != DEBUG_MARKER_OWNER && path.is_dir() && path.join(DEBUG_MARKER).is_file() {
            tracing::info!("Removing folder: {}", path.display());
            remove_dir_all_force(&path)?;
            removed.push(name);
        }
    }
    removed.sort();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn make_modpack(root: &Path, mods: &[&str]) -> PathBuf {
        let pack = root.join("Pack");
        for name in mods {
            let dir = pack.join(MODS_FOLDER).join(name);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("main.lua"), *name).unwrap();
        }
        pack
    }

    fn no_progress(_: &InstallProgress) {}

    #[test]
    fn test_partition_keeps_mandatory() {
        let available = names(&["Cryptid", "ModpackUtil", "Steamodded", "Talisman"]);
        let excluded = names(&["Steamodded", "Talisman"]);

        let (install, skip) = partition_mods(&available, &excluded);
        assert_eq!(install, ["Cryptid", "ModpackUtil", "Steamodded"]);
        assert_eq!(skip, ["Talisman"]);
    }

    #[test]
    fn test_install_filters_and_replaces() {
        let temp = TempDir::new().unwrap();
        let pack = make_modpack(temp.path(), &["Steamodded", "ModpackUtil", "Talisman", "Cryptid"]);
        let mods_dir = temp.path().join("Balatro").join("Mods");
        fs::create_dir_all(mods_dir.join("Talisman")).unwrap();
        fs::write(mods_dir.join("Talisman/stale.lua"), "old").unwrap();

        let options = InstallOptions::default();
        let report = install_modpack(&pack, &mods_dir, &names(&["Cryptid"]), &options, &no_progress).unwrap();

        assert_eq!(report.installed, ["ModpackUtil", "Steamodded", "Talisman"]);
        assert_eq!(report.skipped, ["Cryptid"]);
        assert!(!mods_dir.join("Cryptid").exists());
        // Destination folders are replaced, not merged
        assert!(!mods_dir.join("Talisman/stale.lua").exists());
        assert_eq!(fs::read_to_string(mods_dir.join("Talisman/main.lua")).unwrap(), "Talisman");
    }

    #[test]
    fn test_install_with_backup_and_removal() {
        let temp = TempDir::new().unwrap();
        let pack = make_modpack(temp.path(), &["Steamodded"]);
        let mods_dir = temp.path().join("Mods");
        fs::create_dir_all(mods_dir.join("OldMod")).unwrap();

        let options = InstallOptions {
            backup_existing: true,
            remove_existing: true,
            cancel: None,
        };
        let report = install_modpack(&pack, &mods_dir, &[], &options, &no_progress).unwrap();

        let backup = report.backup.unwrap();
        assert!(backup.join("OldMod").is_dir());
        assert!(backup.file_name().unwrap().to_string_lossy().starts_with("Mods-backup-"));
        assert!(!mods_dir.join("OldMod").exists());
        assert!(mods_dir.join("Steamodded/main.lua").is_file());
    }

    #[test]
    fn test_backups_in_same_second_stay_separate() {
        let temp = TempDir::new().unwrap();
        let mods_dir = temp.path().join("Mods");
        fs::create_dir_all(mods_dir.join("First")).unwrap();
        let first = backup_mods_directory(&mods_dir).unwrap().unwrap();

        fs::create_dir_all(mods_dir.join("Second")).unwrap();
        let second = backup_mods_directory(&mods_dir).unwrap().unwrap();

        assert_ne!(first, second);
        assert!(first.join("First").is_dir());
        assert!(!first.join("Second").exists());
        assert!(second.join("Second").is_dir());
    }

    #[test]
    fn test_remove_existing_clears_old_mods() {
        let temp = TempDir::new().unwrap();
        let pack = make_modpack(temp.path(), &["Steamodded"]);
        let mods_dir = temp.path().join("Mods");
        fs::create_dir_all(mods_dir.join("OldMod")).unwrap();

        let options = InstallOptions {
            remove_existing: true,
            ..InstallOptions::default()
        };
        install_modpack(&pack, &mods_dir, &[], &options, &no_progress).unwrap();
        assert!(!mods_dir.join("OldMod").exists());
    }

    #[test]
    fn test_missing_mods_folder_is_actionable() {
        let temp = TempDir::new().unwrap();
        let result = install_modpack(
            temp.path(),
            &temp.path().join("Mods"),
            &[],
            &InstallOptions::default(),
            &no_progress,
        );
        let err = result.unwrap_err();
        assert!(matches!(err, Error::ModsFolderMissing { .. }));
        assert!(err.to_string().contains("force download"));
    }

    #[test]
    fn test_cancelled_install() {
        let temp = TempDir::new().unwrap();
        let pack = make_modpack(temp.path(), &["Steamodded", "Talisman"]);
        let flag = Arc::new(AtomicBool::new(true));
        let options = InstallOptions::default().with_cancel(flag);

        let result = install_modpack(&pack, &temp.path().join("Mods"), &[], &options, &no_progress);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn test_debug_folders_removed() {
        let temp = TempDir::new().unwrap();
        let mods_dir = temp.path();
        for name in ["Steamodded", "DebugPlus", "Talisman"] {
            fs::create_dir_all(mods_dir.join(name)).unwrap();
        }
        fs::write(mods_dir.join("Steamodded").join(DEBUG_MARKER), "").unwrap();
        fs::write(mods_dir.join("DebugPlus").join(DEBUG_MARKER), "").unwrap();

        assert_eq!(remove_debug_folders(mods_dir).unwrap(), ["DebugPlus"]);
        assert!(mods_dir.join("Steamodded").exists());
        assert!(mods_dir.join("Talisman").exists());
    }

    #[test]
    fn test_uninstall() {
        let temp = TempDir::new().unwrap();
        let mods_dir = temp.path().join("Mods");
        assert!(matches!(uninstall(&mods_dir), Err(Error::NothingToUninstall { .. })));

        fs::create_dir_all(mods_dir.join("Talisman")).unwrap();
        uninstall(&mods_dir).unwrap();
        assert!(!mods_dir.exists());
    }
}
