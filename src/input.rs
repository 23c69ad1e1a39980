//! Turning command-line paths into a flat list of candidate files.

use crate::walk::{enumerate, FilePattern, SearchMode};
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    /// Neither a directory nor a file matching the pattern.
    #[error("Invalid file/dir path: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Cannot read current directory: {0}")]
    CurrentDir(#[source] io::Error),
}

/// Resolve `inputs` into candidate files.
///
/// With no inputs the current directory is scanned. Otherwise directories are
/// enumerated and files are taken as-is, in argument order. The first path
/// that is missing, or a file whose name does not match `pattern`, fails the
/// whole resolution.
pub fn resolve_inputs(
    inputs: &[PathBuf],
    pattern: &FilePattern,
    mode: SearchMode,
) -> Result<Vec<PathBuf>, InputError> {
    if inputs.is_empty() {
        let cwd = env::current_dir().map_err(InputError::CurrentDir)?;
        return Ok(enumerate(&cwd, pattern, mode));
    }

    let mut files = Vec::new();
    for input in inputs {
        files.extend(resolve_one(input, pattern, mode)?);
    }
    Ok(files)
}

fn resolve_one(
    path: &Path,
    pattern: &FilePattern,
    mode: SearchMode,
) -> Result<Vec<PathBuf>, InputError> {
    if path.is_dir() {
        Ok(enumerate(path, pattern, mode))
    } else if path.is_file() && pattern.matches_path(path) {
        Ok(vec![path.to_path_buf()])
    } else {
        Err(InputError::InvalidPath {
            path: path.to_path_buf(),
        })
    }
}
