//! File-system helpers for hosts.
//!
//! Small utility surface used by hosts to locate and load sequence data:
//! whole-file reads/writes, existence checks, and recursive filename
//! matching under a directory.

use crate::error::{Error, Result};
use globset::Glob;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read a whole file into a string.
pub fn get_contents(path: impl AsRef<Path>) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Write a string to a file, replacing any existing contents.
pub fn set_contents(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    Ok(fs::write(path, contents)?)
}

/// Check whether a path exists. Absence is not an error.
pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Recursively match filenames under a directory.
///
/// `pattern` is a glob applied to the file name only (not the full
/// path), e.g. `"*.tfrecord"` or an exact name. Returns matching file
/// paths sorted for determinism; the list may be empty. Fails with an
/// I/O error if the tree cannot be read.
pub fn match_recursive(dir: impl AsRef<Path>, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)
        .map_err(|e| Error::Pattern(e.to_string()))?
        .compile_matcher();

    let mut matches = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && matcher.is_match(Path::new(entry.file_name())) {
            matches.push(entry.into_path());
        }
    }
    matches.sort();
    Ok(matches)
}
