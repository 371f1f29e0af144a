//! Timestamped copies of the game's save file

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::fs::{timestamp, unique_path};

/// Save file name inside a profile slot.
pub const SAVE_FILE: &str = "save.jkr";
/// Backup folder name inside a profile slot.
pub const BACKUP_FOLDER: &str = "autosave";
/// Extension shared by saves and their backups.
pub const SAVE_EXTENSION: &str = "jkr";
/// Profile slot used by default.
pub const DEFAULT_SLOT: &str = "1";

/// Save backups for one profile slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveBackups {
    save_file: PathBuf,
    backup_dir: PathBuf,
}

impl SaveBackups {
    pub fn new(save_file: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_file: save_file.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// Locate a slot next to the mods directory.
    ///
    /// The game keeps `Mods` and the numbered profile slots side by side in
    /// its data folder, so `<data>/Mods` gives `<data>/<slot>/save.jkr`.
    pub fn from_mods_dir(mods_dir: &Path, slot: &str) -> Result<Self> {
        let data_dir = mods_dir
            .parent()
            .ok_or_else(|| Error::InvalidPath(mods_dir.display().to_string()))?;
        let slot_dir = data_dir.join(slot);
        Ok(Self::new(slot_dir.join(SAVE_FILE), slot_dir.join(BACKUP_FOLDER)))
    }

    pub fn save_file(&self) -> &Path {
        &self.save_file
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copy the save file to `autosave/save-<timestamp>.jkr`.
    ///
    /// # Returns
    /// Path of the new backup.
    pub fn perform(&self) -> Result<PathBuf> {
        if !self.save_file.is_file() {
            return Err(Error::SaveFileMissing {
                path: self.save_file.clone(),
            });
        }
        fs::create_dir_all(&self.backup_dir)?;

        let target = unique_path(&self.backup_dir, &format!("save-{}", timestamp()), SAVE_EXTENSION);
        fs::copy(&self.save_file, &target)?;
        tracing::info!("Backup successful: {}", target.display());
        Ok(target)
    }

    /// Backup file names, sorted (oldest first given the timestamp format).
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.backup_dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&self.backup_dir)?
            .filter_map(std::result::Result::ok)
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| is_backup_name(name))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Restore a backup over the save file.
    ///
    /// The current save (if any) is first copied to
    /// `save-<timestamp>-bk.jkr` (or `-bk-N`) so a restore can be undone.
    ///
    /// # Returns
    /// Where the previous save was kept, if there was one.
    pub fn restore(&self, backup_name: &str) -> Result<Option<PathBuf>> {
        let backup = self.resolve(backup_name)?;

        let kept = if self.save_file.is_file() {
            let kept = unique_path(&self.backup_dir, &format!("save-{}-bk", timestamp()), SAVE_EXTENSION);
            fs::copy(&self.save_file, &kept)?;
            tracing::info!("Current save backed up as: {}", kept.display());
            Some(kept)
        } else {
            None
        };

        if let Some(parent) = self.save_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&backup, &self.save_file)?;
        tracing::info!("Backup {backup_name} restored to {SAVE_FILE}");
        Ok(kept)
    }

    /// Delete every `.jkr` file in the backup folder.
    ///
    /// # Returns
    /// Number of files deleted.
    pub fn delete_all(&self) -> Result<usize> {
        let names = self.list()?;
        for name in &names {
            fs::remove_file(self.backup_dir.join(name))?;
        }
        tracing::info!("All backups deleted ({})", names.len());
        Ok(names.len())
    }

    /// Open the backup folder in the system file browser.
    pub fn open_folder(&self) -> Result<()> {
        fs::create_dir_all(&self.backup_dir)?;
        open::that(&self.backup_dir)?;
        Ok(())
    }

    fn resolve(&self, backup_name: &str) -> Result<PathBuf> {
        let not_found = || Error::BackupNotFound {
            name: backup_name.to_string(),
        };
        // Only bare file names inside the backup folder
        if Path::new(backup_name).file_name().and_then(|n| n.to_str()) != Some(backup_name)
            || !is_backup_name(backup_name)
        {
            return Err(not_found());
        }
        let path = self.backup_dir.join(backup_name);
        if path.is_file() { Ok(path) } else { Err(not_found()) }
    }
}

fn is_backup_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SAVE_EXTENSION))
}
