//! Archive operations module

pub mod zip;

use crate::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::Path;
use tracing::debug;

/// File extension recognised as an archive. Matching is case-sensitive.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Whether `path` names an archive this crate extracts
pub fn is_archive<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().extension() == Some(OsStr::new(ARCHIVE_EXTENSION))
}

/// File name of `path` without its final extension
///
/// This is the name of the folder an archive is extracted into. It is kept
/// as raw OS bytes so distinct file names always give distinct folders.
/// A bare `.zip` has no extension and is never treated as an archive.
pub fn archive_stem<P: AsRef<Path>>(path: P) -> Result<OsString> {
    let path = path.as_ref();
    path.file_stem()
        .map(OsStr::to_os_string)
        .ok_or_else(|| Error::InvalidPath(format!("{:?} has no file name", path)))
}

/// Extract an archive into `output_dir`, creating it if needed
pub fn extract<P: AsRef<Path>, Q: AsRef<Path>>(archive: P, output_dir: Q) -> Result<()> {
    let archive = archive.as_ref();
    let output_dir = output_dir.as_ref();

    if !archive.is_file() {
        return Err(Error::NotFound(archive.to_path_buf()));
    }

    // Detect format by extension
    let ext = archive
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");
    debug!(archive = ?archive, format = ext, "Dispatching extraction");

    match ext {
        ARCHIVE_EXTENSION => zip::extract_zip(archive, output_dir),
        _ => Err(Error::UnsupportedFormat(ext.to_string())),
    }
}
