//! Common assertions for unzipper testing

use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Asserts that `dir` contains exactly these files (relative paths, `/`
/// separated) with exactly these text contents. Directories are not listed.
pub fn assert_dir_files(dir: &Path, expected: &[(&str, &str)]) -> Result<()> {
    let mut actual = collect_files(dir)?;
    actual.sort();

    let mut wanted: Vec<PathBuf> = expected.iter().map(|(p, _)| PathBuf::from(p)).collect();
    wanted.sort();

    assert_eq!(actual, wanted, "File set mismatch under {:?}", dir);

    for (relative, content) in expected {
        let found = std::fs::read_to_string(dir.join(relative))?;
        assert_eq!(
            found, *content,
            "Content mismatch for {:?}",
            relative
        );
    }

    Ok(())
}

/// Asserts that the immediate subdirectories of `dir` are exactly `names`
pub fn assert_subdirs(dir: &Path, names: &[&str]) -> Result<()> {
    let mut actual: Vec<String> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    actual.sort();

    let mut wanted: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    wanted.sort();

    assert_eq!(actual, wanted, "Subdirectory mismatch under {:?}", dir);
    Ok(())
}

fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.path().strip_prefix(dir)?.to_path_buf());
        }
    }
    Ok(files)
}
