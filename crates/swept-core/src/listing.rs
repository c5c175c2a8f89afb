//! Directory listing container.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entry::Entry;

/// The immediate children of one directory, as displayed.
///
/// Entries are kept sorted by size descending once sizing has started;
/// `total_size` is always the sum of the entries' sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Directory that was listed.
    pub path: PathBuf,

    /// Parent directory, if any.
    pub parent: Option<PathBuf>,

    /// Immediate children.
    pub entries: Vec<Entry>,

    /// Sum of the entries' sizes.
    pub total_size: u64,
}

impl ScanResult {
    /// Create a listing, deriving `total_size` from the entries.
    pub fn new(path: impl Into<PathBuf>, parent: Option<PathBuf>, entries: Vec<Entry>) -> Self {
        let mut result = Self {
            path: path.into(),
            parent,
            entries,
            total_size: 0,
        };
        result.recompute_total();
        result
    }

    /// Recompute `total_size` from the entries.
    pub fn recompute_total(&mut self) {
        self.total_size = self.entries.iter().map(|e| e.size).sum();
    }

    /// Sort entries by size descending. Equal sizes keep their relative order.
    pub fn sort_by_size(&mut self) {
        sort_entries_by_size(&mut self.entries);
    }

    /// Find an entry by path.
    pub fn find(&self, path: &Path) -> Option<&Entry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the directory has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over directory entries only.
    pub fn directories(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_dir)
    }
}

/// Stable sort by size descending.
pub fn sort_entries_by_size(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.size.cmp(&a.size));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryId;

    fn file(id: u64, name: &str, size: u64) -> Entry {
        Entry::file(EntryId::new(id), name, format!("/r/{name}"), size)
    }

    #[test]
    fn test_total_derived_on_new() {
        let result = ScanResult::new("/r", None, vec![file(1, "a", 3), file(2, "b", 4)]);
        assert_eq!(result.total_size, 7);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut result = ScanResult::new(
            "/r",
            None,
            vec![file(1, "a", 5), file(2, "b", 9), file(3, "c", 5), file(4, "d", 5)],
        );
        result.sort_by_size();
        let names: Vec<_> = result.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c", "d"]);
    }
}
