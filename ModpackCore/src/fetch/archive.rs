//! Zip and tar.gz extraction

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};

use flate2::read::GzDecoder;

use crate::error::{Error, Result};

/// Extract a zip archive into `dest`.
///
/// Entries whose names would land outside `dest` are rejected.
///
/// # Returns
/// Number of files written.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    fs::create_dir_all(dest)?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| Error::UnsafeArchiveEntry(entry.name().to_string()))?;
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        written += 1;

        if let Some(mode) = entry.unix_mode() {
            set_mode(&target, mode)?;
        }
    }

    tracing::debug!("Extracted {written} files from {}", archive_path.display());
    Ok(written)
}

/// Extract a gzip-compressed tarball into `dest`.
///
/// # Returns
/// Number of files written.
pub fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive_path)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    fs::create_dir_all(dest)?;

    let mut written = 0;
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();
        if !is_enclosed(&path) {
            return Err(Error::UnsafeArchiveEntry(path.display().to_string()));
        }
        let is_file = entry.header().entry_type().is_file();
        entry.unpack_in(dest)?;
        if is_file {
            written += 1;
        }
    }

    tracing::debug!("Extracted {written} files from {}", archive_path.display());
    Ok(written)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

fn is_enclosed(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_zip_nested() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pack.zip");
        write_zip(&archive, &[("Mods/Talisman/main.lua", "return 1"), ("README.md", "hi")]);

        let dest = temp.path().join("Pack");
        assert_eq!(extract_zip(&archive, &dest).unwrap(), 2);
        assert_eq!(
            fs::read_to_string(dest.join("Mods/Talisman/main.lua")).unwrap(),
            "return 1"
        );
    }

    #[test]
    fn test_extract_zip_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.zip");
        write_zip(&archive, &[("../escape.txt", "x")]);

        let result = extract_zip(&archive, &temp.path().join("out"));
        assert!(matches!(result, Err(Error::UnsafeArchiveEntry(_))));
        assert!(!temp.path().join("escape.txt").exists());
    }

    #[test]
    fn test_corrupt_zip_is_archive_error() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("bad.zip");
        fs::write(&archive, "not a zip").unwrap();
        assert!(matches!(
            extract_zip(&archive, &temp.path().join("out")),
            Err(Error::Archive(_))
        ));
    }

    #[test]
    fn test_extract_tar_gz() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("lovely.tar.gz");
        {
            let encoder = flate2::write::GzEncoder::new(File::create(&archive).unwrap(), flate2::Compression::default());
            let mut builder = tar::Builder::new(encoder);
            let data = b"#!/bin/sh\n";
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder.append_data(&mut header, "run_lovely.sh", &data[..]).unwrap();
            builder.into_inner().unwrap().finish().unwrap();
        }

        let dest = temp.path().join("game");
        assert_eq!(extract_tar_gz(&archive, &dest).unwrap(), 1);
        assert!(dest.join("run_lovely.sh").is_file());
    }
}
