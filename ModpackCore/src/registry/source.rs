//! Loading the manifest: remote first, then the local cache, then built-in

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fetch::HttpClient;

use super::builtin::builtin_manifest;
use super::manifest::Manifest;

/// Where a loaded manifest came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestOrigin {
    Remote,
    Cache,
    Builtin,
}

impl ManifestOrigin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote manifest",
            Self::Cache => "cached manifest",
            Self::Builtin => "built-in list",
        }
    }
}

/// A manifest together with its origin.
#[derive(Debug, Clone)]
pub struct LoadedManifest {
    pub manifest: Manifest,
    pub origin: ManifestOrigin,
}

/// Remote manifest location plus its offline cache.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    url: String,
    cache_path: PathBuf,
    offline: bool,
}

impl ManifestSource {
    pub fn new(url: impl Into<String>, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            cache_path: cache_path.into(),
            offline: false,
        }
    }

    /// Skip the network and go straight to the cache.
    #[must_use]
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Load the manifest, never failing.
    ///
    /// Tries the remote URL (caching the result), then the cache, then the
    /// built-in list. Failures along the way are logged.
    pub fn load(&self, http: &HttpClient) -> LoadedManifest {
        if self.offline {
            tracing::info!("Offline: using cached modpack data");
        } else {
            match self.fetch_remote(http) {
                Ok(manifest) => {
                    return LoadedManifest {
                        manifest,
                        origin: ManifestOrigin::Remote,
                    };
                }
                Err(e) => tracing::warn!("Failed to fetch modpack data: {e}"),
            }
        }

        self.load_without_network()
    }

    /// Cache, then built-in.
    pub fn load_without_network(&self) -> LoadedManifest {
        match self.load_cache() {
            Ok(Some(manifest)) => LoadedManifest {
                manifest,
                origin: ManifestOrigin::Cache,
            },
            Ok(None) => {
                tracing::info!("No cached modpack data found");
                builtin()
            }
            Err(e) => {
                tracing::warn!("Failed to load cached modpack data: {e}");
                builtin()
            }
        }
    }

    /// Fetch the remote manifest and refresh the cache.
    pub fn fetch_remote(&self, http: &HttpClient) -> Result<Manifest> {
        tracing::info!("Fetching modpack data from {}", self.url);
        let manifest: Manifest = http.get_json(&self.url)?;
        if let Err(e) = self.write_cache(&manifest) {
            tracing::warn!("Failed to cache modpack data: {e}");
        }
        Ok(manifest)
    }

    /// Read the cached manifest, `None` if there is no cache yet.
    pub fn load_cache(&self) -> Result<Option<Manifest>> {
        match fs::read_to_string(&self.cache_path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_cache(&self, manifest: &Manifest) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.cache_path, serde_json::to_string_pretty(manifest)?)?;
        tracing::debug!("Cached modpack data at {}", self.cache_path.display());
        Ok(())
    }
}

fn builtin() -> LoadedManifest {
    LoadedManifest {
        manifest: builtin_manifest(),
        origin: ManifestOrigin::Builtin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_offline_without_cache_uses_builtin() {
        let temp = TempDir::new().unwrap();
        let source = ManifestSource::new("http://127.0.0.1:9/none.json", temp.path().join("cache.json"));
        let loaded = source.load_without_network();
        assert_eq!(loaded.origin, ManifestOrigin::Builtin);
        assert!(loaded.manifest.modpacks().count() >= 3);
    }

    #[test]
    fn test_offline_prefers_cache() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cache.json");
        fs::write(
            &cache,
            r#"{"modpack_categories": [{"category": "Test", "modpacks": [{"name": "Only", "url": "https://github.com/a/b.git"}]}]}"#,
        )
        .unwrap();

        let loaded = ManifestSource::new("unused", &cache).offline(true).load_without_network();
        assert_eq!(loaded.origin, ManifestOrigin::Cache);
        assert_eq!(loaded.manifest.modpacks().next().unwrap().name, "Only");
    }

    #[test]
    fn test_corrupt_cache_falls_back_to_builtin() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cache.json");
        fs::write(&cache, "{").unwrap();
        let loaded = ManifestSource::new("unused", &cache).load_without_network();
        assert_eq!(loaded.origin, ManifestOrigin::Builtin);
    }
}
