//! Application state shared by every operation
//!
//! Built once at startup and passed to operations explicitly.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use modpack_core::backup::{DEFAULT_SLOT, SaveBackups};
use modpack_core::fetch::{DefaultFetcher, GitClient, HttpClient};
use modpack_core::registry::{MANIFEST_URL, ManifestOrigin, ManifestSource, ModpackRegistry, folder_name};
use modpack_core::settings::{ManagerPaths, Settings};
use modpack_core::selection::PresetStore;

use crate::error::{Error, Result};

/// How the context is built.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Do not contact the manifest server.
    pub offline: bool,
    pub manifest_url: String,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            offline: false,
            manifest_url: MANIFEST_URL.to_string(),
        }
    }
}

/// Settings, registry, paths and the single-operation guard.
#[derive(Debug)]
pub struct AppContext {
    paths: ManagerPaths,
    settings: Settings,
    registry: ModpackRegistry,
    manifest_source: ManifestSource,
    http: HttpClient,
    git: GitClient,
    busy: Arc<AtomicBool>,
    cancel: Arc<AtomicBool>,
}

impl AppContext {
    /// Create the settings folder if needed, load settings and the registry.
    pub fn new(paths: ManagerPaths, options: &ContextOptions) -> Result<Self> {
        paths.ensure()?;
        let http = HttpClient::new()?;
        let manifest_source =
            ManifestSource::new(&options.manifest_url, paths.manifest_cache_file()).offline(options.offline);
        let registry = ModpackRegistry::new(manifest_source.load(&http));
        tracing::info!("Modpack data loaded from {}", registry.origin().as_str());
        Self::assemble(paths, registry, manifest_source, http)
    }

    /// Create a context around an already loaded registry.
    pub fn with_registry(paths: ManagerPaths, registry: ModpackRegistry) -> Result<Self> {
        paths.ensure()?;
        let manifest_source = ManifestSource::new(MANIFEST_URL, paths.manifest_cache_file()).offline(true);
        Self::assemble(paths, registry, manifest_source, HttpClient::new()?)
    }

    fn assemble(
        paths: ManagerPaths,
        registry: ModpackRegistry,
        manifest_source: ManifestSource,
        http: HttpClient,
    ) -> Result<Self> {
        let settings = Settings::load(&paths.settings_file())?;
        Ok(Self {
            paths,
            settings,
            registry,
            manifest_source,
            http,
            git: GitClient::default(),
            busy: Arc::new(AtomicBool::new(false)),
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn paths(&self) -> &ManagerPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Write the current settings to disk.
    pub fn save_settings(&self) -> Result<()> {
        self.settings.save(&self.paths.settings_file())?;
        Ok(())
    }

    /// Restore and save the platform defaults.
    pub fn reset_settings(&mut self) -> Result<()> {
        self.settings = Settings::default();
        self.save_settings()
    }

    pub fn registry(&self) -> &ModpackRegistry {
        &self.registry
    }

    /// Fetch the manifest again, falling back like at startup.
    pub fn refresh_registry(&mut self) -> ManifestOrigin {
        self.registry = ModpackRegistry::new(self.manifest_source.load(&self.http));
        self.registry.origin()
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn git(&self) -> &GitClient {
        &self.git
    }

    /// Fetcher wired to this context's cancellation flag.
    pub fn fetcher(&self) -> DefaultFetcher {
        DefaultFetcher::new(self.git.clone(), self.http.clone()).with_cancel(Arc::clone(&self.cancel))
    }

    /// `modpack` argument, or the configured default modpack.
    pub fn modpack_name<'a>(&'a self, modpack: Option<&'a str>) -> Result<&'a str> {
        match modpack {
            Some(name) => Ok(name),
            None if !self.settings.default_modpack.trim().is_empty() => Ok(self.settings.default_modpack.as_str()),
            None => Err(Error::NoModpackSelected),
        }
    }

    /// Local folder of a modpack branch.
    pub fn modpack_dir(&self, modpack: &str, branch: &str) -> PathBuf {
        self.paths.modpack_dir(&folder_name(modpack, branch))
    }

    pub fn presets(&self) -> PresetStore {
        PresetStore::open(self.paths.presets_file())
    }

    /// Save backups of the default profile slot next to the mods directory.
    pub fn save_backups(&self) -> Result<SaveBackups> {
        Ok(SaveBackups::from_mods_dir(&self.settings.mods_dir(), DEFAULT_SLOT)?)
    }

    /// Flag checked by running operations between steps.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Ask the running operation to stop.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Claim the single operation slot.
    ///
    /// Fails with [`Error::Busy`] while another guard is alive. The
    /// cancellation flag is cleared for the new operation.
    pub fn begin_operation(&self) -> Result<OperationGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| Error::Busy)?;
        self.cancel.store(false, Ordering::SeqCst);
        Ok(OperationGuard {
            busy: Arc::clone(&self.busy),
        })
    }
}

/// Releases the operation slot when dropped.
#[derive(Debug)]
pub struct OperationGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}
