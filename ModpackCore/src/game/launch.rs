//! Starting the game and managing profile executables

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::install::remove_debug_folders;
use crate::settings::{STEAM_APP_ID, Settings};

use super::InjectorAsset;

/// Executable every profile copy is made from.
pub const BASE_EXECUTABLE: &str = "balatro.exe";

/// How the game gets started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchMethod {
    /// Run a profile executable directly (Windows).
    Executable(PathBuf),
    /// Hand a `steam://` URI to the system opener.
    Steam(String),
}

impl LaunchMethod {
    /// Launch method for an OS name as reported by [`std::env::consts::OS`].
    pub fn for_os(os: &str, settings: &Settings) -> Self {
        if os == "windows" {
            Self::Executable(profile_executable(&settings.game_dir(), &settings.profile_name))
        } else {
            Self::Steam(steam_uri())
        }
    }
}

/// `steam://rungameid/<app id>`.
pub fn steam_uri() -> String {
    format!("steam://rungameid/{STEAM_APP_ID}")
}

/// `<game_dir>/<profile>.exe`.
pub fn profile_executable(game_dir: &Path, profile: &str) -> PathBuf {
    game_dir.join(format!("{profile}.exe"))
}

/// Whether the launcher must find the injector before starting the game.
pub fn requires_injector(os: &str) -> bool {
    matches!(os, "windows" | "macos")
}

/// Start the game for the current settings.
///
/// On Windows and macOS the launch is refused when the Lovely injector is
/// missing. Leftover debug folders are removed from the mods directory
/// first. The game process is not waited for.
pub fn launch_game(settings: &Settings) -> Result<LaunchMethod> {
    let os = std::env::consts::OS;
    if requires_injector(os) && !InjectorAsset::for_current_platform()?.is_installed(&settings.game_dir()) {
        return Err(Error::InjectorMissing);
    }

    let mods_dir = settings.mods_dir();
    if mods_dir.is_dir() {
        remove_debug_folders(&mods_dir)?;
    }

    let method = LaunchMethod::for_os(os, settings);
    match &method {
        LaunchMethod::Executable(exe) => {
            if !exe.is_file() {
                return Err(Error::GameExecutableMissing { path: exe.clone() });
            }
            tracing::info!("Launching {}", exe.display());
            let mut command = Command::new(exe);
            if let Some(dir) = exe.parent() {
                command.current_dir(dir);
            }
            command.spawn()?;
        }
        LaunchMethod::Steam(uri) => {
            tracing::info!("Launching game via Steam: {uri}");
            open::that(uri)?;
        }
    }
    Ok(method)
}

/// Create `<profile>.exe` as a copy of `balatro.exe` (or `source`).
///
/// # Returns
/// Path of the profile executable.
pub fn create_profile_executable(game_dir: &Path, profile: &str, source: Option<&Path>) -> Result<PathBuf> {
    let source = source.map_or_else(|| game_dir.join(BASE_EXECUTABLE), Path::to_path_buf);
    if !source.is_file() {
        return Err(Error::GameExecutableMissing { path: source });
    }

    let dest = profile_executable(game_dir, profile);
    if dest.is_file() && same_file_name(&dest, &source) {
        return Ok(dest);
    }
    fs::copy(&source, &dest)?;
    tracing::info!("Profile executable {profile}.exe created");
    Ok(dest)
}

/// Profile names available in the game directory (`.exe` stems), sorted.
pub fn list_profiles(game_dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(game_dir) else {
        return Vec::new();
    };
    let mut profiles: Vec<String> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("exe")))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().to_string()))
        .collect();
    profiles.sort_by_key(|p| p.to_lowercase());
    profiles
}

fn same_file_name(a: &Path, b: &Path) -> bool {
    match (a.file_name(), b.file_name()) {
        (Some(a), Some(b)) => a.to_string_lossy().eq_ignore_ascii_case(&b.to_string_lossy()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn settings(game_dir: &Path, profile: &str) -> Settings {
        Settings {
            game_directory: game_dir.display().to_string(),
            profile_name: profile.to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_launch_method_per_os() {
        let temp = TempDir::new().unwrap();
        let settings = settings(temp.path(), "Cryptid");
        assert_eq!(
            LaunchMethod::for_os("windows", &settings),
            LaunchMethod::Executable(temp.path().join("Cryptid.exe"))
        );
        assert_eq!(
            LaunchMethod::for_os("linux", &settings),
            LaunchMethod::Steam("steam://rungameid/2379780".to_string())
        );
        assert!(requires_injector("macos"));
        assert!(!requires_injector("linux"));
    }

    #[test]
    fn test_create_profile_executable() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(BASE_EXECUTABLE), "exe").unwrap();

        let created = create_profile_executable(temp.path(), "Cryptid", None).unwrap();
        assert_eq!(created, temp.path().join("Cryptid.exe"));
        assert_eq!(fs::read_to_string(&created).unwrap(), "exe");
        assert_eq!(list_profiles(temp.path()), ["balatro", "Cryptid"]);
    }

    #[test]
    fn test_create_profile_without_base() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            create_profile_executable(temp.path(), "Cryptid", None),
            Err(Error::GameExecutableMissing { .. })
        ));
    }
}
