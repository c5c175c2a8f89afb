//! Path-keyed cache of listed child entries.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use swept_core::Entry;

/// Child lists of every directory listed in this session.
///
/// Used to render expanded subdirectories inline without listing them again.
/// Written only by the session (on listing) and the merger (on size updates).
#[derive(Debug, Clone, Default)]
pub struct TreeCache {
    children: HashMap<PathBuf, Vec<Entry>>,
}

impl TreeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached children of `path`.
    pub fn get(&self, path: &Path) -> Option<&[Entry]> {
        self.children.get(path).map(Vec::as_slice)
    }

    /// Store the children of `path`, replacing any previous list.
    pub fn put(&mut self, path: impl Into<PathBuf>, entries: Vec<Entry>) {
        self.children.insert(path.into(), entries);
    }

    /// Check whether `path` has been listed.
    pub fn contains(&self, path: &Path) -> bool {
        self.children.contains_key(path)
    }

    /// Number of cached directories.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over cached directory paths.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.children.keys()
    }

    pub(crate) fn clear(&mut self) {
        self.children.clear();
    }
}
