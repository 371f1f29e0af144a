//! CLI commands for user settings

use std::path::PathBuf;

use modpack_core::settings::{SETTING_KEYS, Settings};
use serde::Serialize;

use crate::cli::confirm;
use crate::context::AppContext;

/// Settings together with the resolved paths, for `--json` output
#[derive(Serialize)]
struct SettingsReport<'a> {
    settings_file: PathBuf,
    game_dir: PathBuf,
    mods_dir: PathBuf,
    #[serde(flatten)]
    settings: &'a Settings,
}

pub fn show(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let settings = ctx.settings();
    if json {
        let report = SettingsReport {
            settings_file: ctx.paths().settings_file(),
            game_dir: settings.game_dir(),
            mods_dir: settings.mods_dir(),
            settings,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Settings file: {}", ctx.paths().settings_file().display());
    println!();
    for key in SETTING_KEYS {
        println!("{key:<28} {}", settings.get(key)?);
    }
    Ok(())
}

pub fn set(ctx: &mut AppContext, key: &str, value: &str) -> anyhow::Result<()> {
    ctx.settings_mut().set(key, value)?;
    ctx.save_settings()?;
    println!("{key} = {}", ctx.settings().get(key)?);
    Ok(())
}

pub fn reset(ctx: &mut AppContext, yes: bool) -> anyhow::Result<()> {
    if !confirm("Restore every setting to its default?", yes)? {
        println!("Reset cancelled.");
        return Ok(());
    }
    ctx.reset_settings()?;
    println!("Settings restored to defaults.");
    Ok(())
}
