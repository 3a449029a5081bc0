//! Zip archive fixtures

use crate::TestDir;
use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// One entry to write into a fixture archive
#[derive(Debug, Clone)]
pub struct ZipEntry {
    name: String,
    content: Option<Vec<u8>>,
    mode: Option<u32>,
}

impl ZipEntry {
    /// A regular file entry
    pub fn file(name: &str, content: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            content: Some(content.to_vec()),
            mode: None,
        }
    }

    /// A directory entry; `name` should end with `/`
    pub fn dir(name: &str) -> Self {
        Self {
            name: name.to_string(),
            content: None,
            mode: None,
        }
    }

    /// Record unix permissions for this entry
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Write a zip archive containing `entries` to `path`
pub fn write_zip(path: &Path, entries: &[ZipEntry]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut zip = ZipWriter::new(File::create(path)?);

    for entry in entries {
        let mut options =
            FileOptions::<'static, ()>::default().compression_method(CompressionMethod::Deflated);
        if let Some(mode) = entry.mode {
            options = options.unix_permissions(mode);
        }

        match &entry.content {
            Some(content) => {
                zip.start_file(entry.name.as_str(), options)?;
                zip.write_all(content)?;
            }
            None => {
                zip.add_directory(entry.name.as_str(), options)?;
            }
        }
    }

    zip.finish()?;
    Ok(())
}

/// Names of every entry stored in a zip archive, in archive order
pub fn zip_entry_names(path: &Path) -> Result<Vec<String>> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        names.push(archive.by_index(i)?.name().to_string());
    }
    Ok(names)
}

/// Archive whose contents are named after `label`, e.g. `a.zip` holds `a.txt`
pub fn labelled_entries(label: &str) -> Vec<ZipEntry> {
    vec![
        ZipEntry::file(&format!("{label}.txt"), format!("contents of {label}").as_bytes()),
        ZipEntry::dir("nested/"),
        ZipEntry::file("nested/info.txt", label.as_bytes()),
    ]
}

/// Creates `source/` with the given archives plus a stray text file
///
/// Each archive is built with [`labelled_entries`] for its stem.
pub fn create_archive_source(test_dir: &TestDir, stems: &[&str]) -> Result<PathBuf> {
    let source = test_dir.create_dir("source")?;
    for stem in stems {
        write_zip(&source.join(format!("{stem}.zip")), &labelled_entries(stem))?;
    }
    test_dir.create_file("source/notes.txt", b"not an archive")?;
    Ok(source)
}

/// Writes a file with a `.zip` name that is not a valid archive
pub fn create_corrupt_archive(test_dir: &TestDir, name: &str) -> Result<PathBuf> {
    test_dir.create_file(name, b"PK\x03\x04 but nothing else that makes sense")
}
