//! Lovely injector download and presence check
//!
//! The injector is a loader placed next to the game executable. Windows
//! (and Proton on Linux) use `version.dll`; macOS uses `liblovely.dylib`
//! started through `run_lovely.sh`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fetch::archive::{extract_tar_gz, extract_zip};
use crate::fetch::{FetchProgressCallback, HttpClient};

/// Latest-release download base of the Lovely injector.
pub const LOVELY_RELEASES: &str = "https://github.com/ethangreen-dev/lovely-injector/releases/latest/download";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    TarGz,
}

/// Injector build for one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectorAsset {
    pub url: String,
    pub kind: ArchiveKind,
    /// Files the archive must leave in the game directory. The first one
    /// marks the injector as installed.
    pub files: &'static [&'static str],
    /// Executable (or app bundle) that must exist in the game directory.
    pub game_executable: &'static str,
}

impl InjectorAsset {
    /// Pick the build for an OS/architecture pair as reported by
    /// [`std::env::consts`].
    pub fn for_target(os: &str, arch: &str) -> Result<Self> {
        match os {
            "macos" => {
                let triple = match arch {
                    "aarch64" => "aarch64-apple-darwin",
                    "x86_64" => "x86_64-apple-darwin",
                    other => return Err(Error::UnsupportedPlatform(format!("macOS on {other}"))),
                };
                Ok(Self {
                    url: format!("{LOVELY_RELEASES}/lovely-{triple}.tar.gz"),
                    kind: ArchiveKind::TarGz,
                    files: &["liblovely.dylib", "run_lovely.sh"],
                    game_executable: "Balatro.app",
                })
            }
            _ => Ok(Self {
                url: format!("{LOVELY_RELEASES}/lovely-x86_64-pc-windows-msvc.zip"),
                kind: ArchiveKind::Zip,
                files: &["version.dll"],
                game_executable: "balatro.exe",
            }),
        }
    }

    pub fn for_current_platform() -> Result<Self> {
        Self::for_target(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Temporary archive name inside the game directory.
    pub fn archive_name(&self) -> &'static str {
        match self.kind {
            ArchiveKind::Zip => "lovely-injector.zip",
            ArchiveKind::TarGz => "lovely-injector.tar.gz",
        }
    }

    /// Path whose presence means the injector is installed.
    pub fn marker(&self, game_dir: &Path) -> PathBuf {
        game_dir.join(self.files[0])
    }

    pub fn is_installed(&self, game_dir: &Path) -> bool {
        self.marker(game_dir).exists()
    }
}

/// Download the injector and unpack it into the game directory.
///
/// # Arguments
/// * `http` - Client used for the download
/// * `game_dir` - Game installation directory
/// * `asset` - Build to install
/// * `progress` - Download byte progress
pub fn install_injector(
    http: &HttpClient,
    game_dir: &Path,
    asset: &InjectorAsset,
    progress: FetchProgressCallback,
) -> Result<()> {
    let game_path = game_dir.join(asset.game_executable);
    if !game_path.exists() {
        return Err(Error::GameExecutableMissing { path: game_path });
    }

    let archive_path = game_dir.join(asset.archive_name());
    let outcome = download_and_unpack(http, game_dir, asset, &archive_path, progress);
    if archive_path.exists()
        && let Err(e) = fs::remove_file(&archive_path)
    {
        tracing::warn!("Could not remove {}: {e}", archive_path.display());
    }
    outcome?;

    tracing::info!("Lovely Injector installed to {}", game_dir.display());
    Ok(())
}

fn download_and_unpack(
    http: &HttpClient,
    game_dir: &Path,
    asset: &InjectorAsset,
    archive_path: &Path,
    progress: FetchProgressCallback,
) -> Result<()> {
    http.download_to(&asset.url, archive_path, None, progress)?;
    match asset.kind {
        ArchiveKind::Zip => extract_zip(archive_path, game_dir)?,
        ArchiveKind::TarGz => extract_tar_gz(archive_path, game_dir)?,
    };
    check_extracted(game_dir, asset)
}

fn check_extracted(game_dir: &Path, asset: &InjectorAsset) -> Result<()> {
    let missing: Vec<&str> = asset
        .files
        .iter()
        .copied()
        .filter(|f| !game_dir.join(f).exists())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingExtractedFiles(missing.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_assets_per_platform() {
        let windows = InjectorAsset::for_target("windows", "x86_64").unwrap();
        assert_eq!(windows.kind, ArchiveKind::Zip);
        assert!(windows.url.ends_with("lovely-x86_64-pc-windows-msvc.zip"));
        assert_eq!(windows.files, ["version.dll"]);

        let mac = InjectorAsset::for_target("macos", "aarch64").unwrap();
        assert_eq!(mac.kind, ArchiveKind::TarGz);
        assert!(mac.url.ends_with("lovely-aarch64-apple-darwin.tar.gz"));
        assert_eq!(mac.game_executable, "Balatro.app");

        assert!(matches!(
            InjectorAsset::for_target("macos", "powerpc"),
            Err(Error::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_installed_marker() {
        let temp = TempDir::new().unwrap();
        let asset = InjectorAsset::for_target("windows", "x86_64").unwrap();
        assert!(!asset.is_installed(temp.path()));
        fs::write(temp.path().join("version.dll"), "").unwrap();
        assert!(asset.is_installed(temp.path()));
    }

    #[test]
    fn test_install_requires_game() {
        let temp = TempDir::new().unwrap();
        let asset = InjectorAsset::for_target("windows", "x86_64").unwrap();
        let http = HttpClient::new().unwrap();
        assert!(matches!(
            install_injector(&http, temp.path(), &asset, &|_| {}),
            Err(Error::GameExecutableMissing { .. })
        ));
    }

    #[test]
    fn test_missing_extracted_files() {
        let temp = TempDir::new().unwrap();
        let asset = InjectorAsset::for_target("macos", "x86_64").unwrap();
        fs::write(temp.path().join("liblovely.dylib"), "").unwrap();
        match check_extracted(temp.path(), &asset) {
            Err(Error::MissingExtractedFiles(files)) => assert_eq!(files, "run_lovely.sh"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
