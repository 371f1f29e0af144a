//! User settings and manager file locations
//!
//! Settings are stored as pretty-printed JSON. Missing keys fall back to the
//! platform defaults so older settings files keep loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::expand_path;

/// Settings file name inside the settings folder.
pub const SETTINGS_FILE: &str = "user_settings.json";
/// Excluded-mods file name inside the settings folder.
pub const EXCLUDED_MODS_FILE: &str = "excluded_mods.json";
/// Presets file name inside the settings folder.
pub const PRESETS_FILE: &str = "modpack_presets.json";
/// Cached remote manifest file name inside the settings folder.
pub const MANIFEST_CACHE_FILE: &str = "modpack_cache.json";
/// Folder (relative to the working directory) that holds downloaded modpacks.
pub const MODPACKS_FOLDER: &str = "Modpacks";

/// Steam app id of the game.
pub const STEAM_APP_ID: u32 = 2_379_780;

#[cfg(target_os = "windows")]
mod platform {
    pub const GAME_DIRECTORY: &str = r"C:\Program Files (x86)\Steam\steamapps\common\Balatro";
    pub const MODS_DIRECTORY: &str = r"%AppData%\Balatro\Mods";
}

#[cfg(target_os = "macos")]
mod platform {
    pub const GAME_DIRECTORY: &str = "~/Library/Application Support/Steam/steamapps/common/Balatro/";
    pub const MODS_DIRECTORY: &str = "~/Library/Application Support/Balatro/Mods";
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
mod platform {
    pub const GAME_DIRECTORY: &str = "/home/$USER/.steam/steam/steamapps/common/Balatro";
    pub const MODS_DIRECTORY: &str = "/home/$USER/.steam/steam/steamapps/compatdata/2379780/pfx/drive_c/users/steamuser/AppData/Roaming/Balatro/Mods";
}

/// Default profile name (also the name of the game executable on Windows).
pub const DEFAULT_PROFILE: &str = "Balatro";
/// Modpack selected when nothing else is configured.
pub const DEFAULT_MODPACK: &str = "Dimserenes-Modpack";
/// Default auto-backup interval in seconds.
pub const DEFAULT_BACKUP_INTERVAL: u64 = 60;

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game install directory (may contain `~`, `$VAR` or `%VAR%`).
    pub game_directory: String,
    /// Profile name; selects the executable and the mods directory.
    pub profile_name: String,
    /// Directory the game loads mods from.
    pub mods_directory: String,
    /// Modpack preselected on start.
    pub default_modpack: String,
    /// Auto-backup interval in seconds.
    pub backup_interval: u64,
    /// Move the existing mods directory aside before installing.
    pub backup_mods: bool,
    /// Delete the existing mods directory before installing.
    pub remove_mods: bool,
    /// Install everything without asking which mods to exclude.
    pub skip_mod_selection: bool,
    /// Install right after a successful download or update.
    #[serde(alias = "auto_install")]
    pub auto_install_after_download: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_directory: platform::GAME_DIRECTORY.to_string(),
            profile_name: DEFAULT_PROFILE.to_string(),
            mods_directory: platform::MODS_DIRECTORY.to_string(),
            default_modpack: DEFAULT_MODPACK.to_string(),
            backup_interval: DEFAULT_BACKUP_INTERVAL,
            backup_mods: false,
            remove_mods: true,
            skip_mod_selection: false,
            auto_install_after_download: false,
        }
    }
}

/// Settings keys accepted by [`Settings::set`], in display order.
pub const SETTING_KEYS: [&str; 9] = [
    "game_directory",
    "profile_name",
    "mods_directory",
    "default_modpack",
    "backup_interval",
    "backup_mods",
    "remove_mods",
    "skip_mod_selection",
    "auto_install_after_download",
];

impl Settings {
    /// Load settings from disk.
    ///
    /// A missing file yields the defaults. A corrupt file is logged and also
    /// yields the defaults, matching what the user would see on first run.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings file {}: {e}", path.display());
                Ok(Self::default())
            }
        }
    }

    /// Save settings to disk, replacing the file wholesale.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Expanded game directory.
    pub fn game_dir(&self) -> PathBuf {
        expand_path(&self.game_directory)
    }

    /// Expanded mods directory.
    pub fn mods_dir(&self) -> PathBuf {
        expand_path(&self.mods_directory)
    }

    /// Get a setting by key as display text.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "game_directory" => self.game_directory.clone(),
            "profile_name" => self.profile_name.clone(),
            "mods_directory" => self.mods_directory.clone(),
            "default_modpack" => self.default_modpack.clone(),
            "backup_interval" => self.backup_interval.to_string(),
            "backup_mods" => self.backup_mods.to_string(),
            "remove_mods" => self.remove_mods.to_string(),
            "skip_mod_selection" => self.skip_mod_selection.to_string(),
            "auto_install_after_download" | "auto_install" => {
                self.auto_install_after_download.to_string()
            }
            _ => return Err(Error::UnknownSetting { key: key.to_string() }),
        };
        Ok(value)
    }

    /// Set a setting from text.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "game_directory" => self.game_directory = value.to_string(),
            "profile_name" => self.profile_name = value.to_string(),
            "mods_directory" => self.mods_directory = value.to_string(),
            "default_modpack" => self.default_modpack = value.to_string(),
            "backup_interval" => {
                let secs: u64 = value.parse().map_err(|_| invalid(key, value, "expected seconds"))?;
                if secs == 0 {
                    return Err(invalid(key, value, "interval must be at least one second"));
                }
                self.backup_interval = secs;
            }
            "backup_mods" => self.backup_mods = parse_bool(key, value)?,
            "remove_mods" => self.remove_mods = parse_bool(key, value)?,
            "skip_mod_selection" => self.skip_mod_selection = parse_bool(key, value)?,
            "auto_install_after_download" | "auto_install" => {
                self.auto_install_after_download = parse_bool(key, value)?;
            }
            _ => return Err(Error::UnknownSetting { key: key.to_string() }),
        }
        Ok(())
    }

    /// Switch to a profile, pointing the mods directory at the profile's
    /// data folder.
    pub fn apply_profile(&mut self, profile: &str) {
        self.profile_name = profile.to_string();
        self.mods_directory = profile_mods_directory(profile);
    }
}

/// Mods directory used by a named profile.
pub fn profile_mods_directory(profile: &str) -> String {
    if cfg!(target_os = "windows") {
        format!(r"%AppData%\{profile}\Mods")
    } else if cfg!(target_os = "macos") {
        format!("~/Library/Application Support/{profile}/Mods")
    } else {
        format!(
            "/home/$USER/.steam/steam/steamapps/compatdata/{STEAM_APP_ID}/pfx/drive_c/users/steamuser/AppData/Roaming/{profile}/Mods"
        )
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn invalid(key: &str, value: &str, message: &str) -> Error {
    Error::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

/// Locations of the manager's own files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerPaths {
    /// Folder holding settings, excluded mods, presets and the manifest cache.
    pub settings_dir: PathBuf,
    /// Folder downloaded modpacks are stored in.
    pub modpacks_dir: PathBuf,
}

impl ManagerPaths {
    /// Create paths from explicit folders.
    pub fn new(settings_dir: impl Into<PathBuf>, modpacks_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings_dir: settings_dir.into(),
            modpacks_dir: modpacks_dir.into(),
        }
    }

    /// Platform default locations.
    ///
    /// Settings live next to the game's own data folder; modpacks are
    /// downloaded into `Modpacks` under the current working directory.
    pub fn platform_default() -> Result<Self> {
        let settings_dir = default_settings_dir().ok_or(Error::SettingsDirNotFound)?;
        let modpacks_dir = std::env::current_dir()?.join(MODPACKS_FOLDER);
        Ok(Self::new(settings_dir, modpacks_dir))
    }

    pub fn settings_file(&self) -> PathBuf {
        self.settings_dir.join(SETTINGS_FILE)
    }

    pub fn excluded_mods_file(&self) -> PathBuf {
        self.settings_dir.join(EXCLUDED_MODS_FILE)
    }

    pub fn presets_file(&self) -> PathBuf {
        self.settings_dir.join(PRESETS_FILE)
    }

    pub fn manifest_cache_file(&self) -> PathBuf {
        self.settings_dir.join(MANIFEST_CACHE_FILE)
    }

    /// Directory a modpack folder lives in after download.
    pub fn modpack_dir(&self, folder_name: &str) -> PathBuf {
        self.modpacks_dir.join(folder_name)
    }

    /// Create the settings folder and seed default files that are missing.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.settings_dir)?;

        let settings_file = self.settings_file();
        if !settings_file.exists() {
            Settings::default().save(&settings_file)?;
            tracing::info!("Created file: {}", settings_file.display());
        }

        let excluded_file = self.excluded_mods_file();
        if !excluded_file.exists() {
            fs::write(&excluded_file, "[]")?;
            tracing::info!("Created file: {}", excluded_file.display());
        }

        Ok(())
    }
}

#[cfg(target_os = "windows")]
fn default_settings_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("Balatro").join("ManagerSettings"))
}

#[cfg(target_os = "macos")]
fn default_settings_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("Balatro").join("ManagerSettings"))
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn default_settings_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".balatro").join("ManagerSettings"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::load(&temp.path().join(SETTINGS_FILE)).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.remove_mods);
        assert_eq!(settings.backup_interval, 60);
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join(SETTINGS_FILE);

        let mut settings = Settings::default();
        settings.default_modpack = "Fine-tuned-Pack".to_string();
        settings.backup_mods = true;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults_and_accepts_legacy_key() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{"profile_name": "Cryptid", "auto_install": true}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.profile_name, "Cryptid");
        assert!(settings.auto_install_after_download);
        assert_eq!(settings.default_modpack, DEFAULT_MODPACK);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(SETTINGS_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_set_parses_values() {
        let mut settings = Settings::default();
        settings.set("backup_interval", "120").unwrap();
        settings.set("skip_mod_selection", "yes").unwrap();
        settings.set("mods_directory", "/tmp/Mods").unwrap();

        assert_eq!(settings.backup_interval, 120);
        assert!(settings.skip_mod_selection);
        assert_eq!(settings.get("mods_directory").unwrap(), "/tmp/Mods");
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set("backup_interval", "soon"),
            Err(Error::InvalidSetting { .. })
        ));
        assert!(matches!(
            settings.set("backup_interval", "0"),
            Err(Error::InvalidSetting { .. })
        ));
        assert!(matches!(
            settings.set("colour", "red"),
            Err(Error::UnknownSetting { .. })
        ));
    }

    #[test]
    fn test_apply_profile_moves_mods_directory() {
        let mut settings = Settings::default();
        settings.apply_profile("Cryptid");
        assert_eq!(settings.profile_name, "Cryptid");
        assert!(settings.mods_directory.contains("Cryptid"));
    }

    #[test]
    fn test_ensure_seeds_files() {
        let temp = TempDir::new().unwrap();
        let paths = ManagerPaths::new(temp.path().join("settings"), temp.path().join("Modpacks"));
        paths.ensure().unwrap();

        assert!(paths.settings_file().exists());
        assert_eq!(fs::read_to_string(paths.excluded_mods_file()).unwrap(), "[]");

        // Existing files are left alone
        fs::write(paths.excluded_mods_file(), r#"["Talisman"]"#).unwrap();
        paths.ensure().unwrap();
        assert_eq!(
            fs::read_to_string(paths.excluded_mods_file()).unwrap(),
            r#"["Talisman"]"#
        );
    }
}
