//! Bringing a local modpack folder in sync with its remote source
//!
//! [`Fetcher`] is the port the rest of the crate talks to. [`DefaultFetcher`]
//! implements it by shelling out to `git` for repositories and streaming zip
//! archives over HTTP.

pub mod archive;
mod batch;
pub mod git;
mod http;
mod verify;

pub use batch::{BatchFetchItem, BatchFetchResult, batch_fetch};
pub use git::GitClient;
pub use http::HttpClient;
pub use verify::{IntegrityReport, verify_modpack};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};
use crate::registry::{ModpackEntry, is_git_url};
use crate::utils::fs::{is_populated_dir, remove_dir_all_force};

// ============================================================================
// Progress Types
// ============================================================================

/// Progress callback type for fetch operations
pub type FetchProgressCallback<'a> = &'a (dyn Fn(&FetchProgress) + Sync + Send);

/// Progress information during a fetch
#[derive(Debug, Clone)]
pub struct FetchProgress {
    /// Current operation phase
    pub phase: FetchPhase,
    /// Bytes downloaded, or the submodule index (1-indexed)
    pub current: u64,
    /// Total bytes, or the submodule count (0 when unknown)
    pub total: u64,
    /// Git output line or submodule name (if applicable)
    pub detail: Option<String>,
}

impl FetchProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(phase: FetchPhase, current: u64, total: u64) -> Self {
        Self {
            phase,
            current,
            total,
            detail: None,
        }
    }

    /// Create a progress update carrying a line of text
    #[must_use]
    pub fn with_detail(phase: FetchPhase, current: u64, total: u64, detail: impl Into<String>) -> Self {
        Self {
            phase,
            current,
            total,
            detail: Some(detail.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0), `None` when the total is unknown
    #[must_use]
    pub fn percentage(&self) -> Option<f32> {
        if self.total == 0 {
            None
        } else {
            Some(self.current as f32 / self.total as f32)
        }
    }
}

/// Phase of a fetch operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Clearing an existing destination
    Preparing,
    /// `git clone` running
    Cloning,
    /// Discarding local changes before an update
    Resetting,
    /// `git pull` running
    Pulling,
    /// Updating submodules one by one
    Submodules,
    /// Streaming an archive
    Downloading,
    /// Unpacking an archive
    Extracting,
    /// Operation complete
    Complete,
}

impl FetchPhase {
    /// Get a human-readable description of this phase
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::Cloning => "Cloning",
            Self::Resetting => "Resetting local changes",
            Self::Pulling => "Pulling latest changes",
            Self::Submodules => "Updating submodules",
            Self::Downloading => "Downloading",
            Self::Extracting => "Extracting",
            Self::Complete => "Complete",
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Where a modpack comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSource {
    /// A Git repository cloned at `branch` with submodules.
    Git { url: String, branch: String },
    /// A zip archive downloaded and extracted.
    Archive { url: String },
}

impl FetchSource {
    /// Pick the source kind from the URL (`.git` means a repository).
    pub fn from_url(url: &str, branch: &str) -> Self {
        if is_git_url(url) {
            Self::Git {
                url: url.to_string(),
                branch: branch.to_string(),
            }
        } else {
            Self::Archive {
                url: url.to_string(),
            }
        }
    }

    pub fn for_entry(entry: &ModpackEntry, branch: &str) -> Self {
        Self::from_url(&entry.url, branch)
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Git { url, .. } | Self::Archive { url } => url,
        }
    }
}

/// A single fetch: source, destination folder and overwrite policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub source: FetchSource,
    pub destination: PathBuf,
    /// Delete an existing destination instead of failing.
    pub force: bool,
}

impl FetchRequest {
    pub fn new(source: FetchSource, destination: impl Into<PathBuf>) -> Self {
        Self {
            source,
            destination: destination.into(),
            force: false,
        }
    }

    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

// ============================================================================
// Port
// ============================================================================

/// Fetch port: bring a local folder in sync with a remote source.
pub trait Fetcher {
    /// Download into `request.destination`.
    ///
    /// On success the destination exists and is non-empty. On failure any
    /// partially written destination has been removed where feasible.
    fn fetch(&self, request: &FetchRequest, progress: FetchProgressCallback) -> Result<PathBuf>;

    /// Update an existing download in place.
    ///
    /// The default re-downloads from scratch.
    fn update(&self, request: &FetchRequest, progress: FetchProgressCallback) -> Result<PathBuf> {
        self.fetch(&request.clone().force(true), progress)
    }
}

/// `git` + HTTP implementation of [`Fetcher`].
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    git: GitClient,
    http: HttpClient,
    cancel: Option<Arc<AtomicBool>>,
}

impl DefaultFetcher {
    pub fn new(git: GitClient, http: HttpClient) -> Self {
        Self {
            git,
            http,
            cancel: None,
        }
    }

    /// Check `flag` between download chunks and abort when it is set.
    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn git(&self) -> &GitClient {
        &self.git
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    fn fetch_archive(&self, url: &str, destination: &Path, progress: FetchProgressCallback) -> Result<()> {
        let temp_zip = archive_temp_path(destination);
        let result = self
            .http
            .download_to(url, &temp_zip, self.cancel.as_deref(), progress)
            .and_then(|_| {
                progress(&FetchProgress::new(FetchPhase::Extracting, 0, 0));
                archive::extract_zip(&temp_zip, destination)
            });

        if temp_zip.exists()
            && let Err(e) = fs::remove_file(&temp_zip)
        {
            tracing::warn!("Failed to remove {}: {e}", temp_zip.display());
        }
        result.map(|_| ())
    }
}

impl Fetcher for DefaultFetcher {
    fn fetch(&self, request: &FetchRequest, progress: FetchProgressCallback) -> Result<PathBuf> {
        let destination = &request.destination;
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }

        prepare_destination(destination, request.force, progress)?;
        tracing::info!("Fetching {} into {}", request.source.url(), destination.display());

        let result = match &request.source {
            FetchSource::Git { url, branch } => self.git.clone_repo(url, branch, destination, progress),
            FetchSource::Archive { url } => self.fetch_archive(url, destination, progress),
        }
        .and_then(|()| ensure_populated(destination));

        match result {
            Ok(()) => {
                progress(&FetchProgress::new(FetchPhase::Complete, 1, 1));
                tracing::info!("Successfully downloaded {}", destination.display());
                Ok(destination.clone())
            }
            Err(e) => {
                cleanup_partial(destination);
                Err(e)
            }
        }
    }

    fn update(&self, request: &FetchRequest, progress: FetchProgressCallback) -> Result<PathBuf> {
        match &request.source {
            FetchSource::Git { .. } => {
                self.git.update(&request.destination, progress)?;
                ensure_populated(&request.destination)?;
                progress(&FetchProgress::new(FetchPhase::Complete, 1, 1));
                Ok(request.destination.clone())
            }
            FetchSource::Archive { .. } => self.fetch(&request.clone().force(true), progress),
        }
    }
}

/// Make room for a fresh download.
///
/// An existing destination is removed (clearing read-only files) when
/// `force` is set, and is an error otherwise.
pub fn prepare_destination(destination: &Path, force: bool, progress: FetchProgressCallback) -> Result<()> {
    if destination.exists() {
        if !force {
            return Err(Error::DestinationExists {
                path: destination.to_path_buf(),
            });
        }
        progress(&FetchProgress::with_detail(
            FetchPhase::Preparing,
            0,
            0,
            destination.display().to_string(),
        ));
        remove_dir_all_force(destination)?;
        tracing::info!("Deleted existing folder: {}", destination.display());
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Fail unless the destination exists and has at least one entry.
pub fn ensure_populated(destination: &Path) -> Result<()> {
    if is_populated_dir(destination) {
        Ok(())
    } else {
        Err(Error::EmptyDestination {
            path: destination.to_path_buf(),
        })
    }
}

fn cleanup_partial(destination: &Path) {
    if destination.exists() {
        match remove_dir_all_force(destination) {
            Ok(()) => tracing::debug!("Removed partial download {}", destination.display()),
            Err(e) => tracing::warn!("Failed to remove partial download {}: {e}", destination.display()),
        }
    }
}

fn archive_temp_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".zip");
    destination.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_progress(_: &FetchProgress) {}

    #[test]
    fn test_source_from_url() {
        assert!(matches!(
            FetchSource::from_url("https://github.com/Dimserene/Fine-tuned-Pack.git", "dev"),
            FetchSource::Git { branch, .. } if branch == "dev"
        ));
        assert!(matches!(
            FetchSource::from_url("https://example.com/pack.zip", "main"),
            FetchSource::Archive { .. }
        ));
    }

    #[test]
    fn test_prepare_existing_without_force_fails() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("Pack");
        fs::create_dir_all(&dest).unwrap();

        assert!(matches!(
            prepare_destination(&dest, false, &no_progress),
            Err(Error::DestinationExists { .. })
        ));
        assert!(dest.exists());
    }

    #[test]
    fn test_prepare_existing_with_force_clears() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("Pack");
        fs::create_dir_all(dest.join("Mods/Talisman")).unwrap();

        prepare_destination(&dest, true, &no_progress).unwrap();
        assert!(!dest.exists());
    }

    #[test]
    fn test_ensure_populated() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("Pack");
        assert!(ensure_populated(&dest).is_err());

        fs::create_dir_all(&dest).unwrap();
        assert!(matches!(ensure_populated(&dest), Err(Error::EmptyDestination { .. })));

        fs::write(dest.join("README.md"), "").unwrap();
        ensure_populated(&dest).unwrap();
    }

    #[test]
    fn test_archive_temp_path_is_sibling() {
        let path = archive_temp_path(Path::new("/tmp/Modpacks/Pack"));
        assert_eq!(path, Path::new("/tmp/Modpacks/Pack.zip"));
    }
}
