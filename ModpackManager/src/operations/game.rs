//! Profiles, the injector and launching the game

use std::path::PathBuf;

use modpack_core::fetch::FetchProgressCallback;
use modpack_core::game::{self, InjectorAsset, LaunchMethod};

use crate::context::AppContext;
use crate::error::Result;

/// Switch to a profile and save the settings.
///
/// The mods directory follows the profile name. With `create_executable`
/// the profile's `.exe` is created from `balatro.exe` in the game directory.
///
/// # Returns
/// The profile executable when one was created.
pub fn set_profile(ctx: &mut AppContext, profile: &str, create_executable: bool) -> Result<Option<PathBuf>> {
    ctx.settings_mut().apply_profile(profile);
    ctx.save_settings()?;
    tracing::info!("Profile set to {profile}");

    if !create_executable {
        return Ok(None);
    }
    let exe = game::create_profile_executable(&ctx.settings().game_dir(), profile, None)?;
    Ok(Some(exe))
}

/// Whether the injector for this platform is present in the game directory.
pub fn injector_installed(ctx: &AppContext) -> Result<bool> {
    Ok(InjectorAsset::for_current_platform()?.is_installed(&ctx.settings().game_dir()))
}

/// Download and unpack the injector into the game directory.
pub fn install_injector(ctx: &AppContext, progress: FetchProgressCallback) -> Result<()> {
    let _guard = ctx.begin_operation()?;
    let asset = InjectorAsset::for_current_platform()?;
    game::install_injector(ctx.http(), &ctx.settings().game_dir(), &asset, progress)?;
    Ok(())
}

/// Launch the game with the current settings.
pub fn play(ctx: &AppContext) -> Result<LaunchMethod> {
    Ok(game::launch_game(ctx.settings())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use modpack_core::registry::ModpackRegistry;
    use modpack_core::settings::{ManagerPaths, Settings};
    use tempfile::TempDir;

    #[test]
    fn test_set_profile_persists() {
        let temp = TempDir::new().unwrap();
        let paths = ManagerPaths::new(temp.path().join("settings"), temp.path().join("Modpacks"));
        let mut ctx = AppContext::with_registry(paths.clone(), ModpackRegistry::builtin()).unwrap();

        assert_eq!(set_profile(&mut ctx, "Cryptid", false).unwrap(), None);

        let saved = Settings::load(&paths.settings_file()).unwrap();
        assert_eq!(saved.profile_name, "Cryptid");
        assert!(saved.mods_directory.contains("Cryptid"));
    }

    #[test]
    fn test_set_profile_creates_executable() {
        let temp = TempDir::new().unwrap();
        let paths = ManagerPaths::new(temp.path().join("settings"), temp.path().join("Modpacks"));
        let mut ctx = AppContext::with_registry(paths, ModpackRegistry::builtin()).unwrap();

        let game_dir = temp.path().join("Balatro");
        std::fs::create_dir_all(&game_dir).unwrap();
        std::fs::write(game_dir.join("balatro.exe"), "exe").unwrap();
        ctx.settings_mut().game_directory = game_dir.display().to_string();

        let exe = set_profile(&mut ctx, "Cryptid", true).unwrap().unwrap();
        assert_eq!(exe, game_dir.join("Cryptid.exe"));
        assert!(exe.exists());
    }
}
