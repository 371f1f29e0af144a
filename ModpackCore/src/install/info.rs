//! Which modpack is currently installed

use std::fs;
use std::path::Path;

/// Folder of the utility mod that carries the version markers.
const UTIL_MOD: &str = "ModpackUtil";
const VERSION_FILE: &str = "CurrentVersion.txt";
const NAME_FILE: &str = "ModpackName.txt";
const LEGACY_NAME_FILE: &str = "CurrentPack.txt";
const UTIL_LUA: &str = "ModpackUtil.lua";
const LUA_VERSION_PREFIX: &str = "--- VERSION:";

/// Name and version of the installed modpack, as far as they can be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

impl InstalledInfo {
    pub fn is_installed(&self) -> bool {
        self.name.is_some()
    }

    /// One-line summary for display.
    pub fn summary(&self) -> String {
        match &self.name {
            Some(name) => format!(
                "Installed pack: {name} ({})",
                self.version.as_deref().unwrap_or("unknown")
            ),
            None => "No modpack installed or ModpackUtil mod removed.".to_string(),
        }
    }
}

/// Read the version markers from `<mods_dir>/ModpackUtil`.
///
/// The name comes from `ModpackName.txt`, then `CurrentPack.txt`, then the
/// `--- VERSION:` header of `ModpackUtil.lua`.
pub fn read_installed_info(mods_dir: &Path) -> InstalledInfo {
    let util = mods_dir.join(UTIL_MOD);
    let version = read_trimmed(&util.join(VERSION_FILE));
    let name = read_trimmed(&util.join(NAME_FILE))
        .or_else(|| read_trimmed(&util.join(LEGACY_NAME_FILE)))
        .or_else(|| lua_header_name(&util.join(UTIL_LUA)));

    InstalledInfo { name, version }
}

fn read_trimmed(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let trimmed = content.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn lua_header_name(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    content.lines().find_map(|line| {
        let value = line.strip_prefix(LUA_VERSION_PREFIX)?.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_name_and_version_files() {
        let temp = TempDir::new().unwrap();
        let util = temp.path().join(UTIL_MOD);
        fs::create_dir_all(&util).unwrap();
        fs::write(util.join(VERSION_FILE), "1.4.2\n").unwrap();
        fs::write(util.join(NAME_FILE), "Fine-tuned Pack").unwrap();

        let info = read_installed_info(temp.path());
        assert_eq!(info.summary(), "Installed pack: Fine-tuned Pack (1.4.2)");
    }

    #[test]
    fn test_lua_header_fallback() {
        let temp = TempDir::new().unwrap();
        let util = temp.path().join(UTIL_MOD);
        fs::create_dir_all(&util).unwrap();
        fs::write(util.join(UTIL_LUA), "--- MOD_NAME: Util\n--- VERSION: Dimserene's Modpack\n").unwrap();

        let info = read_installed_info(temp.path());
        assert_eq!(info.name.as_deref(), Some("Dimserene's Modpack"));
        assert_eq!(info.version, None);
    }

    #[test]
    fn test_nothing_installed() {
        let temp = TempDir::new().unwrap();
        let info = read_installed_info(temp.path());
        assert!(!info.is_installed());
        assert_eq!(info.summary(), "No modpack installed or ModpackUtil mod removed.");
    }
}
