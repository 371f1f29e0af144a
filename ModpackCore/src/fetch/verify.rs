//! Integrity check for downloaded modpacks

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::utils::fs::is_empty_or_hidden_only;

/// Result of checking a modpack's `Mods` folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub mods_dir: PathBuf,
    /// Number of mod folders checked.
    pub checked: usize,
    /// Mod folders that are empty or hold only `.git` (failed submodule
    /// checkouts), sorted by name.
    pub broken: Vec<String>,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.broken.is_empty()
    }
}

/// Check every mod folder directly under `<modpack>/Mods`.
pub fn verify_modpack(modpack_dir: &Path) -> Result<IntegrityReport> {
    let mods_dir = modpack_dir.join("Mods");
    if !mods_dir.is_dir() {
        return Err(Error::ModsFolderMissing { path: mods_dir });
    }

    let mut checked = 0;
    let mut broken: Vec<String> = Vec::new();
    for entry in WalkDir::new(&mods_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_dir())
    {
        checked += 1;
        if is_empty_or_hidden_only(entry.path()) {
            broken.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    broken.sort();

    if broken.is_empty() {
        tracing::info!("All {checked} mod folders in {} are populated", mods_dir.display());
    } else {
        tracing::warn!("{} mod folders are not downloaded correctly", broken.len());
    }

    Ok(IntegrityReport {
        mods_dir,
        checked,
        broken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_flags_empty_and_git_only_folders() {
        let temp = TempDir::new().unwrap();
        let mods = temp.path().join("Mods");
        fs::create_dir_all(mods.join("Talisman")).unwrap();
        fs::write(mods.join("Talisman/main.lua"), "").unwrap();
        fs::create_dir_all(mods.join("Cryptid/.git")).unwrap();
        fs::create_dir_all(mods.join("Bmwallet")).unwrap();

        let report = verify_modpack(temp.path()).unwrap();
        assert_eq!(report.checked, 3);
        assert_eq!(report.broken, ["Bmwallet", "Cryptid"]);
        assert!(!report.is_ok());
    }

    #[test]
    fn test_missing_mods_folder() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            verify_modpack(temp.path()),
            Err(Error::ModsFolderMissing { .. })
        ));
    }
}
