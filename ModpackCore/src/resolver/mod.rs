//! Dependency-aware mod selection
//!
//! A selection holds one "excluded" flag per installable mod. Toggling a mod
//! propagates through a static `requires` relation:
//!
//! - Excluding a mod also excludes every mod that (transitively) requires it.
//! - Re-including a mod also re-includes every mod it (transitively) requires.
//!
//! Propagation only visits mods whose flag actually flips, so it terminates on
//! cyclic maps. The cascade runs over owned state and reports the flipped mods
//! once it is done, so front-ends can update their widgets without the
//! updates being fed back into the resolver.

mod state;

pub use state::{ModSelection, ModState};

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;

/// Mapping of a dependent mod to the mods it requires.
pub type DependencyMap = IndexMap<String, Vec<String>>;

/// A single flag change produced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Mod folder name.
    pub name: String,
    /// New state (`true` = excluded from install).
    pub excluded: bool,
}

impl Change {
    fn new(name: &str, excluded: bool) -> Self {
        Self {
            name: name.to_string(),
            excluded,
        }
    }
}

/// Applies the propagation rules over a [`ModSelection`].
#[derive(Debug, Clone, Default)]
pub struct DependencyResolver {
    requires: DependencyMap,
    /// Reverse index: required mod -> mods that require it, in map order.
    required_by: HashMap<String, Vec<String>>,
}

impl DependencyResolver {
    /// Build a resolver over a dependency map.
    #[must_use]
    pub fn new(requires: DependencyMap) -> Self {
        let mut required_by: HashMap<String, Vec<String>> = HashMap::new();
        for (dependent, requirements) in &requires {
            for required in requirements {
                let dependents = required_by.entry(required.clone()).or_default();
                if !dependents.contains(dependent) {
                    dependents.push(dependent.clone());
                }
            }
        }
        Self {
            requires,
            required_by,
        }
    }

    /// The dependency map this resolver was built from.
    pub fn dependencies(&self) -> &DependencyMap {
        &self.requires
    }

    /// Mods that directly require `name`.
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.required_by.get(name).map_or(&[], Vec::as_slice)
    }

    /// Mods that `name` directly requires.
    pub fn requirements_of(&self, name: &str) -> &[String] {
        self.requires.get(name).map_or(&[], Vec::as_slice)
    }

    /// Set a mod's excluded flag and propagate.
    ///
    /// # Arguments
    /// * `selection` - Current selection, updated in place
    /// * `name` - The mod the user toggled
    /// * `excluded` - Its new state (`true` = excluded)
    ///
    /// # Returns
    /// Every flag that flipped, the toggled mod first (if it flipped), then
    /// the cascaded mods in the order they were reached. Toggling a mod that
    /// is not part of the selection changes nothing.
    pub fn toggle(&self, selection: &mut ModSelection, name: &str, excluded: bool) -> Vec<Change> {
        if !selection.contains(name) {
            tracing::debug!("Ignoring toggle of unknown mod {name}");
            return Vec::new();
        }

        let mut changes = Vec::new();
        if selection.set(name, excluded) {
            changes.push(Change::new(name, excluded));
        }
        self.cascade(selection, name, excluded, &mut changes);
        changes
    }

    /// Flip every mod, then propagate from each mod's new state in list order.
    ///
    /// # Returns
    /// Net changes relative to the selection before the call.
    pub fn invert(&self, selection: &mut ModSelection) -> Vec<Change> {
        let before: Vec<bool> = selection.mods().iter().map(|m| m.excluded).collect();

        let names: Vec<String> = selection.names().map(str::to_string).collect();
        for name in &names {
            let flipped = !selection.is_excluded(name).unwrap_or(false);
            selection.set(name, flipped);
        }

        let mut scratch = Vec::new();
        for name in &names {
            if let Some(state) = selection.is_excluded(name) {
                self.cascade(selection, name, state, &mut scratch);
            }
        }

        selection
            .mods()
            .iter()
            .zip(before)
            .filter(|(m, was)| m.excluded != *was)
            .map(|(m, _)| Change::new(&m.name, m.excluded))
            .collect()
    }

    /// Whether every excluded mod's dependents are also excluded.
    ///
    /// Only mods present in the selection are considered.
    pub fn is_consistent(&self, selection: &ModSelection) -> bool {
        selection.mods().iter().filter(|m| m.excluded).all(|m| {
            self.dependents_of(&m.name)
                .iter()
                .all(|d| selection.is_excluded(d).unwrap_or(true))
        })
    }

    fn cascade(&self, selection: &mut ModSelection, start: &str, excluded: bool, changes: &mut Vec<Change>) {
        let mut queue = VecDeque::from([start.to_string()]);

        while let Some(current) = queue.pop_front() {
            let next: &[String] = if excluded {
                self.dependents_of(&current)
            } else {
                self.requirements_of(&current)
            };

            for other in next {
                // Only flip mods that are present and not already in the target state
                if selection.is_excluded(other) == Some(!excluded) {
                    selection.set(other, excluded);
                    changes.push(Change::new(other, excluded));
                    queue.push_back(other.clone());
                }
            }
        }
    }
}
