//! Download and update of registry modpacks

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use modpack_core::fetch::{
    BatchFetchItem, BatchFetchResult, FetchProgressCallback, FetchRequest, FetchSource, Fetcher, batch_fetch,
};
use modpack_core::install::{InstallProgressCallback, InstallReport};
use modpack_core::registry::DEFAULT_BRANCH;

use super::install::install_unguarded;
use crate::context::AppContext;
use crate::error::Result;

/// Result of a download or update.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    /// Set when the modpack was installed right after downloading.
    pub installed: Option<InstallReport>,
}

/// Download a modpack branch into the modpacks folder.
///
/// With `force` an existing folder is replaced. When
/// `auto_install_after_download` is set the modpack is installed afterwards
/// under the same operation guard.
pub fn download_modpack(
    ctx: &AppContext,
    modpack: &str,
    branch: &str,
    force: bool,
    progress: FetchProgressCallback,
    install_progress: InstallProgressCallback,
) -> Result<DownloadOutcome> {
    let _guard = ctx.begin_operation()?;
    let request = build_request(ctx, modpack, branch)?.force(force);

    let path = ctx.fetcher().fetch(&request, progress)?;
    finish(ctx, modpack, branch, path, install_progress)
}

/// Bring an existing download up to date, downloading it first if missing.
///
/// Git checkouts are reset when dirty, pulled and their submodules updated.
/// Zip modpacks are downloaded again.
pub fn update_modpack(
    ctx: &AppContext,
    modpack: &str,
    branch: &str,
    progress: FetchProgressCallback,
    install_progress: InstallProgressCallback,
) -> Result<DownloadOutcome> {
    let _guard = ctx.begin_operation()?;
    let request = build_request(ctx, modpack, branch)?;
    let fetcher = ctx.fetcher();

    let path = if request.destination.exists() {
        fetcher.update(&request, progress)?
    } else {
        tracing::info!("{} is not downloaded yet, downloading", request.destination.display());
        fetcher.fetch(&request, progress)?
    };
    finish(ctx, modpack, branch, path, install_progress)
}

/// Download every registry modpack on its main branch.
///
/// Stops between modpacks once [`AppContext::cancel`] is called.
pub fn download_all(
    ctx: &AppContext,
    force: bool,
    on_item: &dyn Fn(usize, usize, &str),
    progress: FetchProgressCallback,
) -> Result<BatchFetchResult> {
    let _guard = ctx.begin_operation()?;
    let items: Vec<BatchFetchItem> = ctx
        .registry()
        .manifest()
        .modpacks()
        .filter(|entry| !entry.url.trim().is_empty())
        .map(|entry| BatchFetchItem {
            name: entry.name.clone(),
            request: FetchRequest::new(
                FetchSource::for_entry(entry, DEFAULT_BRANCH),
                ctx.modpack_dir(&entry.name, DEFAULT_BRANCH),
            )
            .force(force),
        })
        .collect();

    let cancel = ctx.cancel_flag();
    let result = batch_fetch(&ctx.fetcher(), &items, &cancel, on_item, progress);
    if cancel.load(Ordering::SeqCst) {
        tracing::info!("Batch download cancelled");
    }
    Ok(result)
}

fn build_request(ctx: &AppContext, modpack: &str, branch: &str) -> Result<FetchRequest> {
    let registry = ctx.registry();
    let entry = registry.require(modpack)?;
    registry.validate_branch(modpack, branch)?;
    Ok(FetchRequest::new(
        FetchSource::for_entry(entry, branch),
        ctx.modpack_dir(modpack, branch),
    ))
}

fn finish(
    ctx: &AppContext,
    modpack: &str,
    branch: &str,
    path: PathBuf,
    install_progress: InstallProgressCallback,
) -> Result<DownloadOutcome> {
    let installed = if ctx.settings().auto_install_after_download {
        Some(install_unguarded(ctx, modpack, branch, install_progress)?)
    } else {
        None
    };
    Ok(DownloadOutcome { path, installed })
}
