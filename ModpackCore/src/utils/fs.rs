//! Filesystem helpers shared by fetch, install and backups

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

/// Timestamp format used for backup folders and save backups.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Current local time formatted with [`TIMESTAMP_FORMAT`].
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Recursively delete a directory, clearing read-only attributes if the
/// first attempt is refused.
///
/// Git object files are read-only on Windows, which makes a plain
/// `remove_dir_all` fail on a cloned modpack.
pub fn remove_dir_all_force(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            tracing::debug!("Clearing read-only attributes under {}", path.display());
            for entry in WalkDir::new(path).into_iter().filter_map(std::result::Result::ok) {
                make_writable(entry.path())?;
            }
            fs::remove_dir_all(path)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn make_writable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let meta = fs::symlink_metadata(path)?;
    if meta.file_type().is_symlink() {
        return Ok(());
    }
    let mut perms = meta.permissions();
    perms.set_mode(perms.mode() | 0o200);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(path: &Path) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    if perms.readonly() {
        perms.set_readonly(false);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

/// Copy a directory tree. Existing files at the destination are overwritten.
///
/// Returns the number of files copied.
pub fn copy_dir_all(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| crate::Error::InvalidPath(e.to_string()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Whether a directory has no visible entries.
///
/// Hidden entries (starting with `.`) are ignored, so a folder holding only
/// `.git` counts as empty. Unreadable directories are not reported.
pub fn is_empty_or_hidden_only(dir: &Path) -> bool {
    match fs::read_dir(dir) {
        Ok(entries) => !entries
            .filter_map(std::result::Result::ok)
            .any(|e| !e.file_name().to_string_lossy().starts_with('.')),
        Err(e) => {
            tracing::warn!("Error while processing {}: {e}", dir.display());
            false
        }
    }
}

/// Whether a path exists and is a non-empty directory.
pub fn is_populated_dir(dir: &Path) -> bool {
    dir.is_dir()
        && fs::read_dir(dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
}

/// Find a path that does not exist yet by appending `-1`, `-2`, ... to the stem.
///
/// An empty `extension` gives bare names, for folders.
pub fn unique_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let name = |suffix: &str| {
        if extension.is_empty() {
            format!("{stem}{suffix}")
        } else {
            format!("{stem}{suffix}.{extension}")
        }
    };
    let mut candidate = dir.join(name(""));
    let mut counter = 1;
    while candidate.exists() {
        candidate = dir.join(name(&format!("-{counter}")));
        counter += 1;
    }
    candidate
}
