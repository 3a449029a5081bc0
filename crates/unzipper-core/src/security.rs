//! Path checks for writing archive entries to disk

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tracing::error;

/// Resolve an archive entry name against the extraction directory.
///
/// The returned path always lives under the canonical form of `base`.
/// Entry names containing `..`, a root, or a drive prefix are rejected,
/// so a crafted archive cannot write outside its own destination folder.
/// `base` must exist.
pub fn sanitize_path(base: &Path, untrusted: &Path) -> Result<PathBuf> {
    let canonical_base = base
        .canonicalize()
        .map_err(|e| Error::InvalidPath(format!("Cannot canonicalize base path: {}", e)))?;
    let mut result = canonical_base.clone();

    for component in untrusted.components() {
        match component {
            Component::Normal(name) => result.push(name),
            Component::CurDir => {}
            Component::ParentDir => {
                error!(path = ?untrusted, "Entry contains parent directory component");
                return Err(Error::InvalidPath(format!(
                    "Path traversal attempt detected: {:?}",
                    untrusted
                )));
            }
            Component::RootDir => {
                error!(path = ?untrusted, "Entry is absolute");
                return Err(Error::InvalidPath(format!(
                    "Absolute path not allowed: {:?}",
                    untrusted
                )));
            }
            Component::Prefix(_) => {
                error!(path = ?untrusted, "Entry contains Windows prefix");
                return Err(Error::InvalidPath(format!(
                    "Windows path prefix not allowed: {:?}",
                    untrusted
                )));
            }
        }
    }

    if result == canonical_base {
        return Err(Error::InvalidPath(format!("Empty entry name: {:?}", untrusted)));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_path_normal() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let result = sanitize_path(&base, Path::new("subdir/file.txt")).unwrap();
        assert_eq!(result, base.join("subdir/file.txt"));
    }

    #[test]
    fn test_sanitize_path_skips_cur_dir() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        let result = sanitize_path(&base, Path::new("./a/./b.txt")).unwrap();
        assert_eq!(result, base.join("a/b.txt"));
    }

    #[test]
    fn test_sanitize_path_relative_base() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("out");
        std::fs::create_dir(&nested).unwrap();
        let dotted = nested.join("..").join("out");
        let result = sanitize_path(&dotted, Path::new("file.txt")).unwrap();
        assert!(result.starts_with(nested.canonicalize().unwrap()));
    }

    #[test]
    fn test_sanitize_path_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(sanitize_path(temp_dir.path(), Path::new("../etc/passwd")).is_err());
        assert!(sanitize_path(temp_dir.path(), Path::new("a/../../etc/passwd")).is_err());
    }

    #[test]
    fn test_sanitize_path_absolute() {
        let temp_dir = TempDir::new().unwrap();
        assert!(sanitize_path(temp_dir.path(), Path::new("/etc/passwd")).is_err());
    }

    #[test]
    fn test_sanitize_path_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(sanitize_path(temp_dir.path(), Path::new("")).is_err());
        assert!(sanitize_path(temp_dir.path(), Path::new("./")).is_err());
    }

    #[test]
    fn test_sanitize_path_missing_base() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(sanitize_path(&missing, Path::new("file.txt")).is_err());
    }
}
