// src/watch/walk.rs

//! Enumerate everything under the watch root that should get its own watch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{Result, WwError};
use crate::fs::FileSystem;
use crate::watch::patterns::NameExcludes;

/// Walk `root` recursively and return every file and directory beneath it,
/// including `root` itself.
///
/// - An entry whose basename matches `excludes` is skipped together with
///   everything below it.
/// - Symbolic links to directories are followed, but each real directory is
///   visited at most once.
/// - Failing to read `root` is an error; failing to read anything deeper is
///   logged and that subtree skipped.
///
/// The result is sorted.
pub fn walk_directory(
    fs: &dyn FileSystem,
    root: &Path,
    excludes: &NameExcludes,
) -> Result<Vec<PathBuf>> {
    let root_entries = fs.read_dir(root).map_err(|e| {
        WwError::ConfigError(format!("cannot read watch root {}: {e:#}", root.display()))
    })?;

    let mut visited: HashSet<PathBuf> = HashSet::new();
    visited.insert(canonical_or_self(fs, root));

    let mut paths = vec![root.to_path_buf()];
    let mut pending: Vec<(PathBuf, Vec<PathBuf>)> = vec![(root.to_path_buf(), root_entries)];

    while let Some((dir, entries)) = pending.pop() {
        for entry in entries {
            if excludes.matches_basename(&entry) {
                debug!(path = ?entry, "skipping excluded entry");
                continue;
            }

            paths.push(entry.clone());

            if !fs.is_dir(&entry) {
                continue;
            }
            if !visited.insert(canonical_or_self(fs, &entry)) {
                debug!(path = ?entry, "directory already visited; not descending");
                continue;
            }

            match fs.read_dir(&entry) {
                Ok(children) => pending.push((entry, children)),
                Err(err) => warn!(path = ?entry, parent = ?dir, error = %err, "skipping unreadable directory"),
            }
        }
    }

    paths.sort();
    Ok(paths)
}

fn canonical_or_self(fs: &dyn FileSystem, path: &Path) -> PathBuf {
    fs.canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
