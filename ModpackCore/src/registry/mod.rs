//! Modpack registry
//!
//! Lists the modpacks a user can download, their branches, and the mod
//! dependency map. Read-only for the lifetime of a session.

mod builtin;
mod manifest;
mod source;

pub use builtin::{MANIFEST_URL, builtin_dependencies, builtin_manifest};
pub use manifest::{DEFAULT_BRANCH, Manifest, ModpackCategory, ModpackEntry, is_git_url};
pub use source::{LoadedManifest, ManifestOrigin, ManifestSource};

use crate::error::{Error, Result};
use crate::resolver::DependencyMap;

/// Folder a modpack is downloaded into: the name for `main`, otherwise
/// `<name>-<branch>`.
pub fn folder_name(modpack: &str, branch: &str) -> String {
    if branch == DEFAULT_BRANCH {
        modpack.to_string()
    } else {
        format!("{modpack}-{branch}")
    }
}

/// The set of known modpacks.
#[derive(Debug, Clone)]
pub struct ModpackRegistry {
    manifest: Manifest,
    origin: ManifestOrigin,
}

impl ModpackRegistry {
    #[must_use]
    pub fn new(loaded: LoadedManifest) -> Self {
        Self {
            manifest: loaded.manifest,
            origin: loaded.origin,
        }
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self {
            manifest: builtin_manifest(),
            origin: ManifestOrigin::Builtin,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn origin(&self) -> ManifestOrigin {
        self.origin
    }

    pub fn categories(&self) -> &[ModpackCategory] {
        &self.manifest.modpack_categories
    }

    /// Modpack names in manifest order.
    pub fn names(&self) -> Vec<&str> {
        self.manifest.modpacks().map(|m| m.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ModpackEntry> {
        self.manifest.modpacks().find(|m| m.name == name)
    }

    /// Look up a modpack that must exist and have a URL.
    pub fn require(&self, name: &str) -> Result<&ModpackEntry> {
        let entry = self
            .get(name)
            .ok_or_else(|| Error::ModpackNotFound(name.to_string()))?;
        if entry.url.trim().is_empty() {
            return Err(Error::ModpackUrlMissing {
                name: name.to_string(),
            });
        }
        Ok(entry)
    }

    /// Check that `branch` is listed for the modpack.
    pub fn validate_branch(&self, name: &str, branch: &str) -> Result<()> {
        let entry = self.require(name)?;
        let branches = entry.branches();
        if branches.contains(&branch) {
            Ok(())
        } else {
            Err(Error::BranchNotAvailable {
                modpack: name.to_string(),
                branch: branch.to_string(),
                available: branches.join(", "),
            })
        }
    }

    /// The dependency map: the manifest's when it has one, else the built-in.
    pub fn dependencies(&self) -> DependencyMap {
        match &self.manifest.dependencies {
            Some(deps) if !deps.is_empty() => deps.clone(),
            _ => builtin_dependencies(),
        }
    }
}

impl Default for ModpackRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
