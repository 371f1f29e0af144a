//! CLI commands for the mod checklist and presets

use console::style;
use modpack_core::resolver::Change;
use modpack_core::selection::load_excluded;

use super::definitions::ModpackArgs;
use crate::context::AppContext;
use crate::error::Error;
use crate::operations::SelectionSession;

fn open_session(ctx: &AppContext, target: &ModpackArgs) -> anyhow::Result<SelectionSession> {
    let name = ctx.modpack_name(target.modpack.as_deref())?;
    Ok(SelectionSession::open(ctx, name, &target.branch)?)
}

/// Show every selectable mod
pub fn list(ctx: &AppContext, target: &ModpackArgs) -> anyhow::Result<()> {
    let session = open_session(ctx, target)?;
    let mods = session.selection().mods();
    if mods.is_empty() {
        println!("No selectable mods found.");
        return Ok(());
    }

    for state in mods {
        let (mark, name) = if state.excluded {
            ("[ ]", style(state.name.as_str()).dim())
        } else {
            ("[x]", style(state.name.as_str()))
        };
        let requires = session.resolver().requirements_of(&state.name);
        if requires.is_empty() {
            println!("{mark} {name}");
        } else {
            println!("{mark} {name} (requires {})", requires.join(", "));
        }
    }
    println!();
    println!(
        "{} of {} mods excluded",
        session.selection().excluded().len(),
        mods.len()
    );
    Ok(())
}

/// Exclude, include or flip mods
///
/// `state` is `Some(true)` to exclude, `Some(false)` to include and `None`
/// to flip each mod's current flag.
pub fn toggle(ctx: &AppContext, target: &ModpackArgs, names: &[String], state: Option<bool>) -> anyhow::Result<()> {
    let mut session = open_session(ctx, target)?;
    let mut changes = Vec::new();
    for name in names {
        let current = session
            .selection()
            .is_excluded(name)
            .ok_or_else(|| Error::UnknownMod(name.clone()))?;
        let excluded = state.unwrap_or(!current);
        changes.extend(session.toggle(name, excluded)?);
    }
    session.save()?;
    print_changes(&changes);
    Ok(())
}

/// Flip every mod
pub fn invert(ctx: &AppContext, target: &ModpackArgs) -> anyhow::Result<()> {
    let mut session = open_session(ctx, target)?;
    let changes = session.invert();
    session.save()?;
    print_changes(&changes);
    Ok(())
}

/// Include every mod
pub fn reset(ctx: &AppContext, target: &ModpackArgs) -> anyhow::Result<()> {
    let mut session = open_session(ctx, target)?;
    session.reset();
    session.save()?;
    println!("Every mod will be installed.");
    Ok(())
}

pub fn preset_list(ctx: &AppContext) -> anyhow::Result<()> {
    let presets = ctx.presets();
    let mut empty = true;
    for name in presets.names() {
        empty = false;
        let excluded = presets.get(name)?;
        println!("{:<24} {} excluded", name, excluded.len());
    }
    if empty {
        println!("No presets saved.");
    }
    Ok(())
}

/// Save the current excluded list under `name`
pub fn preset_save(ctx: &AppContext, name: &str) -> anyhow::Result<()> {
    let excluded = load_excluded(&ctx.paths().excluded_mods_file())?;
    let count = excluded.len();
    ctx.presets().save(name, excluded)?;
    println!("Preset '{}' saved ({count} excluded).", name.trim());
    Ok(())
}

pub fn preset_load(ctx: &AppContext, name: &str, target: &ModpackArgs) -> anyhow::Result<()> {
    let mut session = open_session(ctx, target)?;
    session.apply_preset(&ctx.presets(), name)?;
    session.save()?;
    println!(
        "Preset '{name}' loaded: {} mods excluded.",
        session.selection().excluded().len()
    );
    Ok(())
}

pub fn preset_delete(ctx: &AppContext, name: &str) -> anyhow::Result<()> {
    ctx.presets().delete(name)?;
    println!("Preset '{name}' deleted.");
    Ok(())
}

fn print_changes(changes: &[Change]) {
    if changes.is_empty() {
        println!("Nothing changed.");
        return;
    }
    for change in changes {
        if change.excluded {
            println!("  {} {}", style("-").red(), change.name);
        } else {
            println!("  {} {}", style("+").green(), change.name);
        }
    }
}
