// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File,
    Dir(Vec<String>), // List of child names
    /// Directory-like entry that resolves to another directory.
    Link(PathBuf),
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    unreadable: HashSet<PathBuf>,
}

/// In-memory tree for exercising directory enumeration without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.add_dir(".");
        fs
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::File);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        if !matches!(state.entries.get(path), Some(MockEntry::Dir(_))) {
            state.entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        }
        link_into_parent(&mut state, path);
    }

    /// Add `path` as a symbolic link to the directory `target`.
    pub fn add_dir_link(&self, path: impl AsRef<Path>, target: impl AsRef<Path>) {
        self.insert(path.as_ref(), MockEntry::Link(target.as_ref().to_path_buf()));
    }

    /// Make `read_dir` fail for this path, as for a permission error.
    pub fn set_unreadable(&self, path: impl AsRef<Path>) {
        self.lock().unreadable.insert(path.as_ref().to_path_buf());
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut state = self.lock();
        state.entries.insert(path.to_path_buf(), entry);
        link_into_parent(&mut state, path);
    }

    fn resolve(state: &MockState, path: &Path) -> PathBuf {
        let mut current = path.to_path_buf();
        // Bounded so a link cycle cannot spin forever.
        for _ in 0..32 {
            match state.entries.get(&current) {
                Some(MockEntry::Link(target)) => current = target.clone(),
                _ => break,
            }
        }
        current
    }
}

/// Register `path` as a child of its parent, creating parents as needed.
fn link_into_parent(state: &mut MockState, path: &Path) {
    let Some(parent) = path.parent() else {
        return;
    };
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    if parent == path {
        return;
    }

    if !state.entries.contains_key(parent) {
        state.entries.insert(parent.to_path_buf(), MockEntry::Dir(Vec::new()));
        link_into_parent(state, parent);
    }

    if let (Some(MockEntry::Dir(children)), Some(name)) = (
        state.entries.get_mut(parent),
        path.file_name().and_then(|n| n.to_str()),
    ) {
        if !children.iter().any(|c| c == name) {
            children.push(name.to_string());
        }
    }
}

impl FileSystem for MockFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        let state = self.lock();
        let resolved = Self::resolve(&state, path);
        matches!(state.entries.get(&resolved), Some(MockEntry::Dir(_)))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let state = self.lock();
        if !state.entries.contains_key(path) {
            return Err(anyhow!("File not found: {:?}", path));
        }
        Ok(Self::resolve(&state, path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.lock();
        if state.unreadable.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        let resolved = Self::resolve(&state, path);
        match state.entries.get(&resolved) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
