//! Named mod-selection presets
//!
//! A preset records the mods that were excluded when it was saved. Loading it
//! later excludes exactly those mods and includes everything else.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Presets stored in `modpack_presets.json` as `{name: [excluded mods]}`.
#[derive(Debug, Clone, Default)]
pub struct PresetStore {
    path: PathBuf,
    presets: IndexMap<String, Vec<String>>,
}

impl PresetStore {
    /// Open the preset file. A missing or unreadable file gives an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let presets = read_presets(&path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring preset file {}: {e}", path.display());
            IndexMap::new()
        });
        Self { path, presets }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Preset names in the order they were first saved.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Result<&[String]> {
        self.presets
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::PresetNotFound {
                name: name.to_string(),
            })
    }

    /// Save (or overwrite) a preset and write the file.
    pub fn save(&mut self, name: &str, excluded: Vec<String>) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyPresetName);
        }
        self.presets.insert(name.to_string(), excluded);
        self.write()?;
        tracing::info!("Preset '{name}' saved");
        Ok(())
    }

    /// Delete a preset and write the file.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if self.presets.shift_remove(name).is_none() {
            return Err(Error::PresetNotFound {
                name: name.to_string(),
            });
        }
        self.write()?;
        tracing::info!("Preset '{name}' deleted");
        Ok(())
    }

    fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.presets)?)?;
        Ok(())
    }
}

fn read_presets(path: &Path) -> Result<IndexMap<String, Vec<String>>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(IndexMap::new()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_save_reopen_delete() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("modpack_presets.json");

        let mut store = PresetStore::open(&path);
        store.save("No Cryptid", vec!["Cryptid".to_string()]).unwrap();
        store.save("Everything", Vec::new()).unwrap();

        let mut reopened = PresetStore::open(&path);
        assert_eq!(reopened.names().collect::<Vec<_>>(), ["No Cryptid", "Everything"]);
        assert_eq!(reopened.get("No Cryptid").unwrap(), ["Cryptid"]);

        reopened.delete("No Cryptid").unwrap();
        assert!(matches!(
            PresetStore::open(&path).get("No Cryptid"),
            Err(Error::PresetNotFound { .. })
        ));
    }

    #[test]
    fn test_blank_name_rejected() {
        let temp = TempDir::new().unwrap();
        let mut store = PresetStore::open(temp.path().join("p.json"));
        assert!(matches!(store.save("  ", Vec::new()), Err(Error::EmptyPresetName)));
    }

    #[test]
    fn test_corrupt_file_gives_empty_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("p.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(PresetStore::open(&path).names().count(), 0);
    }

    #[test]
    fn test_delete_missing_preset() {
        let temp = TempDir::new().unwrap();
        let mut store = PresetStore::open(temp.path().join("p.json"));
        assert!(store.delete("Nope").is_err());
    }
}
