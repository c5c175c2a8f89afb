//! Directory entry types.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Stable identifier for an entry, assigned by the enumerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl EntryId {
    /// Create a new EntryId from a u64.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// One immediate child of a listed directory.
///
/// `path` is the merge key: size results are matched to entries by path,
/// never by position or id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Identifier assigned at enumeration time.
    pub id: EntryId,

    /// File/directory name (not full path).
    pub name: CompactString,

    /// Full path of the entry.
    pub path: PathBuf,

    /// Whether this entry is a directory.
    pub is_dir: bool,

    /// Size in bytes. Authoritative for files; 0 for directories until sized.
    pub size: u64,

    /// Number of immediate children (directories only, when readable).
    pub child_count: Option<usize>,

    /// Last modification time, shown as "last used".
    pub modified: Option<SystemTime>,
}

impl Entry {
    /// Create a file entry with its authoritative size.
    pub fn file(id: EntryId, name: impl Into<CompactString>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            is_dir: false,
            size,
            child_count: None,
            modified: None,
        }
    }

    /// Create a directory entry. Its size starts at 0.
    pub fn directory(
        id: EntryId,
        name: impl Into<CompactString>,
        path: impl Into<PathBuf>,
        child_count: Option<usize>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            is_dir: true,
            size: 0,
            child_count,
            modified: None,
        }
    }

    /// Set the modification time.
    pub fn with_modified(mut self, modified: Option<SystemTime>) -> Self {
        self.modified = modified;
        self
    }

    /// Return a copy of this entry carrying a new size.
    pub fn resized(&self, size: u64) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

/// The answer to a single size computation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeResult {
    /// Path that was sized.
    pub path: PathBuf,
    /// Recursive size in bytes.
    pub size: u64,
}

impl SizeResult {
    /// Create a new size result.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// The degraded result used when computing a size failed.
    pub fn zero(path: &Path) -> Self {
        Self::new(path, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_starts_unsized() {
        let entry = Entry::directory(EntryId::new(1), "src", "/p/src", Some(4));
        assert!(entry.is_dir);
        assert_eq!(entry.size, 0);
        assert_eq!(entry.child_count, Some(4));
    }

    #[test]
    fn test_resized_keeps_identity() {
        let entry = Entry::file(EntryId::new(7), "a.txt", "/p/a.txt", 10);
        let resized = entry.resized(99);
        assert_eq!(resized.size, 99);
        assert_eq!(resized.id, entry.id);
        assert_eq!(resized.path, entry.path);
        assert_eq!(entry.size, 10);
    }
}
