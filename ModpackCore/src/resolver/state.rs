//! Ordered per-mod selection state

/// One installable mod and whether the user excluded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModState {
    /// Mod folder name.
    pub name: String,
    /// `true` when the mod will be skipped on install.
    pub excluded: bool,
}

/// The checkbox list: every selectable mod of a modpack, in display order.
///
/// Locked mods (the loader and utility mod) are never part of a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModSelection {
    mods: Vec<ModState>,
}

impl ModSelection {
    /// Build a selection with every mod included, leaving out `locked` names.
    pub fn new<I, S>(mods: I, locked: &[&str]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::default();
        for name in mods {
            let name = name.into();
            if locked.contains(&name.as_str()) || selection.contains(&name) {
                continue;
            }
            selection.mods.push(ModState {
                name,
                excluded: false,
            });
        }
        selection
    }

    pub fn mods(&self) -> &[ModState] {
        &self.mods
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mods.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.mods.iter().any(|m| m.name == name)
    }

    /// State of a mod, or `None` if it is not part of the selection.
    pub fn is_excluded(&self, name: &str) -> Option<bool> {
        self.mods.iter().find(|m| m.name == name).map(|m| m.excluded)
    }

    /// Set a flag directly, without propagation. Returns whether it changed.
    pub(crate) fn set(&mut self, name: &str, excluded: bool) -> bool {
        match self.mods.iter_mut().find(|m| m.name == name) {
            Some(state) if state.excluded != excluded => {
                state.excluded = excluded;
                true
            }
            _ => false,
        }
    }

    /// Excluded mod names in display order.
    pub fn excluded(&self) -> Vec<String> {
        self.mods
            .iter()
            .filter(|m| m.excluded)
            .map(|m| m.name.clone())
            .collect()
    }

    /// Included mod names in display order.
    pub fn included(&self) -> Vec<String> {
        self.mods
            .iter()
            .filter(|m| !m.excluded)
            .map(|m| m.name.clone())
            .collect()
    }

    /// Replace every flag from a saved excluded list, without propagation.
    ///
    /// Names in `excluded` that are not part of the selection are ignored.
    pub fn apply_excluded(&mut self, excluded: &[String]) {
        for state in &mut self.mods {
            state.excluded = excluded.contains(&state.name);
        }
    }

    /// Include every mod.
    pub fn reset(&mut self) {
        for state in &mut self.mods {
            state.excluded = false;
        }
    }
}
