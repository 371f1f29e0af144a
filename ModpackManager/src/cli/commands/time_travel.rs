//! CLI commands for switching a Git modpack between versions

use std::path::PathBuf;

use console::style;
use modpack_core::registry::DEFAULT_BRANCH;
use modpack_core::time_travel;

use crate::context::AppContext;

fn repository(ctx: &AppContext, modpack: Option<&str>) -> anyhow::Result<PathBuf> {
    let name = ctx.modpack_name(modpack)?;
    Ok(ctx.modpack_dir(name, DEFAULT_BRANCH))
}

pub fn list(ctx: &AppContext, modpack: Option<&str>, limit: usize) -> anyhow::Result<()> {
    let repo = repository(ctx, modpack)?;
    let commits = time_travel::list_versions(ctx.git(), &repo)?;
    for commit in commits.iter().take(limit) {
        println!("{} {}", style(&commit.hash[..commit.hash.len().min(8)]).dim(), commit.subject);
    }
    if commits.len() > limit {
        println!("... {} older versions", commits.len() - limit);
    }
    Ok(())
}

pub fn find(ctx: &AppContext, modpack: Option<&str>, version: &str) -> anyhow::Result<()> {
    let repo = repository(ctx, modpack)?;
    let commit = time_travel::find_version(ctx.git(), &repo, version)?;
    println!("{} {}", commit.hash, commit.subject);
    Ok(())
}

/// Check out the newest commit matching `version`
pub fn go(ctx: &AppContext, modpack: Option<&str>, version: &str) -> anyhow::Result<()> {
    let _guard = ctx.begin_operation()?;
    let repo = repository(ctx, modpack)?;
    let commit = time_travel::find_version(ctx.git(), &repo, version)?;
    time_travel::travel_to(ctx.git(), &repo, &commit.hash)?;
    println!("Time traveled to {} ({}).", commit.subject, &commit.hash[..commit.hash.len().min(8)]);
    println!("Run `modpack-manager install` to install this version.");
    Ok(())
}

pub fn back(ctx: &AppContext, modpack: Option<&str>) -> anyhow::Result<()> {
    let _guard = ctx.begin_operation()?;
    let repo = repository(ctx, modpack)?;
    time_travel::travel_back(ctx.git(), &repo)?;
    println!("Back on the latest version ({DEFAULT_BRANCH}).");
    println!("Run `modpack-manager install` to install it.");
    Ok(())
}
