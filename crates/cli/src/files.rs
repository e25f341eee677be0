//! Resolution of the command-line file selection into the list handed to the assembler.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rars_engine::common::constants::is_source_file;
use tracing::debug;

/// Expands the named files into absolute paths.
///
/// Outside project mode each entry is resolved in order and a directory expands to
/// its source files; a path reached twice is kept at its first position. In project
/// mode the first entry is the main file: every source file in its directory is
/// included with the main file first, followed by the remaining entries that are
/// not already present.
///
/// # Arguments
///
/// * `filenames` - Files and directories as given on the command line.
/// * `project_mode` - Whether to expand the main file's directory.
///
/// # Returns
///
/// The resolved list; the first element is the main file.
pub fn resolve<S: AsRef<str>>(filenames: &[S], project_mode: bool) -> io::Result<Vec<PathBuf>> {
    let Some((main, rest)) = filenames.split_first() else {
        return Ok(Vec::new());
    };

    if !project_mode {
        let mut files = Vec::new();
        for name in filenames {
            push_new(&mut files, expand(Path::new(name.as_ref()))?);
        }
        debug!(count = files.len(), "resolved files");
        return Ok(files);
    }

    let main = std::path::absolute(main.as_ref())?;
    let mut files = vec![main.clone()];
    if let Some(directory) = main.parent() {
        push_new(&mut files, source_files(directory)?);
    }
    for name in rest {
        push_new(&mut files, expand(Path::new(name.as_ref()))?);
    }
    debug!(count = files.len(), main = %main.display(), "resolved project files");
    Ok(files)
}

/// A file resolves to itself; a directory to the source files directly inside it.
fn expand(path: &Path) -> io::Result<Vec<PathBuf>> {
    let path = std::path::absolute(path)?;
    if path.is_dir() {
        source_files(&path)
    } else {
        Ok(vec![path])
    }
}

/// Source files directly inside `directory`, sorted by name.
fn source_files(directory: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_file() && is_source_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn push_new(files: &mut Vec<PathBuf>, candidates: Vec<PathBuf>) {
    for candidate in candidates {
        if !files.contains(&candidate) {
            files.push(candidate);
        }
    }
}
