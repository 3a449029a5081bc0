//! Zip archive extraction

use crate::security::sanitize_path;
use crate::Result;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

/// Extract every entry of a zip archive into `output_dir`
///
/// The output directory and any intermediate directories are created.
/// Existing files with the same name are overwritten. Entries whose names
/// would land outside `output_dir` abort the extraction.
pub fn extract_zip<P: AsRef<Path>, Q: AsRef<Path>>(archive_path: P, output_dir: Q) -> Result<()> {
    let archive_path = archive_path.as_ref();
    let output_dir = output_dir.as_ref();

    info!("Extracting ZIP {:?} to {:?}", archive_path, output_dir);

    fs::create_dir_all(output_dir)?;

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = PathBuf::from(entry.name());
        let dest_path = sanitize_path(output_dir, &name)?;

        debug!("Extracting: {:?}", name);

        if entry.is_dir() {
            fs::create_dir_all(&dest_path)?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }
        extract_zip_file(&mut entry, &dest_path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode & 0o777))?;
            }
        }
    }

    info!("Successfully extracted ZIP archive {:?}", archive_path);
    Ok(())
}

/// Write a single entry to disk
fn extract_zip_file<R: Read>(entry: &mut R, dest_path: &Path) -> Result<()> {
    let mut outfile = File::create(dest_path)?;
    io::copy(entry, &mut outfile)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::TempDir;
    use unzipper_testing::fixtures::{write_zip, ZipEntry};

    #[test]
    fn test_extract_files_and_directories() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let archive_path = temp_dir.path().join("test.zip");
        let extract_dir = temp_dir.path().join("extracted");

        write_zip(
            &archive_path,
            &[
                ZipEntry::dir("docs/"),
                ZipEntry::file("docs/readme.txt", b"read me"),
                ZipEntry::file("top.txt", b"Test content"),
                ZipEntry::file("deep/nested/leaf.bin", &[0, 1, 2]),
            ],
        )
        .unwrap();

        extract_zip(&archive_path, &extract_dir)?;

        assert_eq!(fs::read(extract_dir.join("top.txt"))?, b"Test content");
        assert_eq!(fs::read(extract_dir.join("docs/readme.txt"))?, b"read me");
        assert_eq!(fs::read(extract_dir.join("deep/nested/leaf.bin"))?, [0, 1, 2]);
        assert!(extract_dir.join("docs").is_dir());
        Ok(())
    }

    #[test]
    fn test_extract_overwrites_existing_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let archive_path = temp_dir.path().join("test.zip");
        let extract_dir = temp_dir.path().join("extracted");
        fs::create_dir_all(&extract_dir)?;
        fs::write(extract_dir.join("file.txt"), b"stale")?;

        write_zip(&archive_path, &[ZipEntry::file("file.txt", b"fresh")]).unwrap();
        extract_zip(&archive_path, &extract_dir)?;

        assert_eq!(fs::read(extract_dir.join("file.txt"))?, b"fresh");
        Ok(())
    }

    #[test]
    fn test_extract_corrupt_archive() {
        let temp_dir = TempDir::new().unwrap();
        let archive_path = temp_dir.path().join("broken.zip");
        fs::write(&archive_path, b"this is not a zip file").unwrap();

        let err = extract_zip(&archive_path, temp_dir.path().join("out")).unwrap_err();
        assert!(matches!(err, Error::Zip(_)), "unexpected error: {err}");
    }

    #[test]
    fn test_extract_rejects_path_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let archive_path = temp_dir.path().join("evil.zip");
        let extract_dir = temp_dir.path().join("out");

        write_zip(&archive_path, &[ZipEntry::file("../escaped.txt", b"gotcha")]).unwrap();

        let err = extract_zip(&archive_path, &extract_dir).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
        assert!(!temp_dir.path().join("escaped.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_extract_restores_permissions() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new()?;
        let archive_path = temp_dir.path().join("perm.zip");
        let extract_dir = temp_dir.path().join("out");

        write_zip(
            &archive_path,
            &[ZipEntry::file("run.sh", b"#!/bin/sh\n").with_mode(0o755)],
        )
        .unwrap();
        extract_zip(&archive_path, &extract_dir)?;

        let mode = fs::metadata(extract_dir.join("run.sh"))?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
        Ok(())
    }
}
