//! Creation, enumeration and removal of store directories.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::domain::Name;

/// Creates `path` and any missing parents. Succeeds if it already exists.
///
/// # Errors
///
/// Returns an error if a directory cannot be created, or if `path` exists and
/// is not a directory.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

/// Recursively removes a directory tree, children before parents.
///
/// Returns `false` without touching the filesystem if `path` does not exist.
/// Symbolic links are removed, never followed.
///
/// # Errors
///
/// Returns the first error encountered while reading or removing any entry.
/// Entries removed before the failure stay removed.
pub fn remove_tree(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    }

    for entry in WalkDir::new(path)
        .follow_root_links(false)
        .contents_first(true)
    {
        let entry = entry?;
        if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
        tracing::trace!("removed {}", entry.path().display());
    }

    Ok(true)
}

/// Lists the immediate subdirectories of `path`, sorted by name.
///
/// Directories whose names are not valid [`Name`]s (including non UTF-8
/// names) are skipped with a warning. Plain files are ignored.
///
/// # Errors
///
/// Returns an error if `path` cannot be read.
pub fn subdirectories(path: &Path) -> io::Result<Vec<(Name, PathBuf)>> {
    let mut dirs = Vec::new();

    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            tracing::warn!("Skipping directory with non UTF-8 name: {}", entry.path().display());
            continue;
        };

        match Name::try_from(file_name) {
            Ok(name) => dirs.push((name, entry.into_path())),
            Err(e) => {
                tracing::warn!("Skipping directory {}: {e}", entry.path().display());
            }
        }
    }

    Ok(dirs)
}
