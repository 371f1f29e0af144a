//! Editing the excluded-mods list of a downloaded modpack

use std::path::PathBuf;

use modpack_core::install::{MANDATORY_MODS, list_mods};
use modpack_core::resolver::{Change, DependencyResolver, ModSelection};
use modpack_core::selection::{PresetStore, load_excluded, save_excluded};

use crate::context::AppContext;
use crate::error::{Error, Result};

/// The mod checklist of one modpack, backed by the saved excluded list.
///
/// Changes stay in memory until [`SelectionSession::save`].
#[derive(Debug, Clone)]
pub struct SelectionSession {
    selection: ModSelection,
    resolver: DependencyResolver,
    excluded_path: PathBuf,
}

impl SelectionSession {
    /// Load the modpack's mods and apply the saved excluded list.
    pub fn open(ctx: &AppContext, modpack: &str, branch: &str) -> Result<Self> {
        let mods = list_mods(&ctx.modpack_dir(modpack, branch))?;
        let mut selection = ModSelection::new(mods, &MANDATORY_MODS);

        let excluded_path = ctx.paths().excluded_mods_file();
        selection.apply_excluded(&load_excluded(&excluded_path)?);

        Ok(Self {
            selection,
            resolver: DependencyResolver::new(ctx.registry().dependencies()),
            excluded_path,
        })
    }

    pub fn selection(&self) -> &ModSelection {
        &self.selection
    }

    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    /// Set one mod's flag and propagate it through the dependency map.
    pub fn toggle(&mut self, name: &str, excluded: bool) -> Result<Vec<Change>> {
        if !self.selection.contains(name) {
            return Err(Error::UnknownMod(name.to_string()));
        }
        Ok(self.resolver.toggle(&mut self.selection, name, excluded))
    }

    /// Flip every mod.
    pub fn invert(&mut self) -> Vec<Change> {
        self.resolver.invert(&mut self.selection)
    }

    /// Include every mod.
    pub fn reset(&mut self) {
        self.selection.reset();
    }

    /// Replace the selection with a preset's excluded mods.
    pub fn apply_preset(&mut self, presets: &PresetStore, name: &str) -> Result<()> {
        let excluded = presets.get(name)?;
        self.selection.apply_excluded(excluded);
        Ok(())
    }

    /// Store the current excluded mods as a preset.
    pub fn save_preset(&self, presets: &mut PresetStore, name: &str) -> Result<()> {
        presets.save(name, self.selection.excluded())?;
        Ok(())
    }

    /// Write the excluded list used by the next install.
    pub fn save(&self) -> Result<()> {
        save_excluded(&self.excluded_path, &self.selection.excluded())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modpack_core::registry::ModpackRegistry;
    use modpack_core::settings::ManagerPaths;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn setup(temp: &TempDir) -> AppContext {
        let paths = ManagerPaths::new(temp.path().join("settings"), temp.path().join("Modpacks"));
        for name in ["Steamodded", "ModpackUtil", "Talisman", "Cryptid", "Bunco"] {
            fs::create_dir_all(paths.modpack_dir("Dimserenes-Modpack").join("Mods").join(name)).unwrap();
        }
        AppContext::with_registry(paths, ModpackRegistry::builtin()).unwrap()
    }

    #[test]
    fn test_mandatory_mods_are_not_selectable() {
        let temp = TempDir::new().unwrap();
        let ctx = setup(&temp);
        let session = SelectionSession::open(&ctx, "Dimserenes-Modpack", "main").unwrap();
        let names: Vec<&str> = session.selection().names().collect();
        assert_eq!(names, ["Bunco", "Cryptid", "Talisman"]);
    }

    #[test]
    fn test_toggle_save_and_reopen() {
        let temp = TempDir::new().unwrap();
        let ctx = setup(&temp);

        let mut session = SelectionSession::open(&ctx, "Dimserenes-Modpack", "main").unwrap();
        let changes = session.toggle("Talisman", true).unwrap();
        assert_eq!(changes.len(), 2);
        session.save().unwrap();

        let reopened = SelectionSession::open(&ctx, "Dimserenes-Modpack", "main").unwrap();
        assert_eq!(reopened.selection().excluded(), ["Cryptid", "Talisman"]);
    }

    #[test]
    fn test_unknown_and_locked_mods_rejected() {
        let temp = TempDir::new().unwrap();
        let ctx = setup(&temp);
        let mut session = SelectionSession::open(&ctx, "Dimserenes-Modpack", "main").unwrap();
        assert!(matches!(session.toggle("Steamodded", true), Err(Error::UnknownMod(_))));
        assert!(matches!(session.toggle("Nope", true), Err(Error::UnknownMod(_))));
    }

    #[test]
    fn test_presets_round_trip_through_session() {
        let temp = TempDir::new().unwrap();
        let ctx = setup(&temp);
        let mut presets = ctx.presets();

        let mut session = SelectionSession::open(&ctx, "Dimserenes-Modpack", "main").unwrap();
        session.toggle("Bunco", true).unwrap();
        session.save_preset(&mut presets, "No Bunco").unwrap();

        session.reset();
        assert!(session.selection().excluded().is_empty());
        session.apply_preset(&ctx.presets(), "No Bunco").unwrap();
        assert_eq!(session.selection().excluded(), ["Bunco"]);
    }
}
