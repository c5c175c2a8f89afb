//! Hardlink deduplication for sizing passes.

use std::fs::Metadata;

use dashmap::DashSet;

/// (inode, device) pair identifying a file with more than one link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InodeKey {
    pub inode: u64,
    pub device: u64,
}

impl InodeKey {
    /// Create a new inode key.
    pub fn new(inode: u64, device: u64) -> Self {
        Self { inode, device }
    }

    /// Key for a hardlinked file, or `None` if the file has a single link
    /// (or the platform has no inode numbers).
    #[cfg(unix)]
    pub fn of_hardlinked(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;

        (metadata.nlink() > 1).then(|| Self::new(metadata.ino(), metadata.dev()))
    }

    #[cfg(not(unix))]
    pub fn of_hardlinked(_metadata: &Metadata) -> Option<Self> {
        None
    }
}

/// Hardlinked files seen during one sizing pass.
///
/// Safe to share across jwalk's worker threads.
#[derive(Debug, Default)]
pub struct InodeTracker {
    seen: DashSet<InodeKey>,
}

impl InodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sighting. Returns `true` the first time `key` is seen.
    pub fn first_sighting(&self, key: InodeKey) -> bool {
        self.seen.insert(key)
    }

    /// Check whether a file's bytes belong in the total: always for
    /// single-link files, only on first sighting for hardlinked ones.
    pub fn counts(&self, metadata: &Metadata) -> bool {
        InodeKey::of_hardlinked(metadata).is_none_or(|key| self.first_sighting(key))
    }

    /// Number of distinct hardlinked files seen.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_first_sighting_per_device() {
        let tracker = InodeTracker::new();

        assert!(tracker.first_sighting(InodeKey::new(42, 1)));
        assert!(!tracker.first_sighting(InodeKey::new(42, 1)));
        assert!(tracker.first_sighting(InodeKey::new(42, 2)));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_single_link_files_always_count() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("solo");
        fs::write(&file, "x").unwrap();
        let meta = fs::metadata(&file).unwrap();

        let tracker = InodeTracker::new();
        assert!(tracker.counts(&meta));
        assert!(tracker.counts(&meta));
        assert!(tracker.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_hardlinks_count_once() {
        let temp = TempDir::new().unwrap();
        let original = temp.path().join("original");
        let link = temp.path().join("link");
        fs::write(&original, "shared").unwrap();
        fs::hard_link(&original, &link).unwrap();

        let tracker = InodeTracker::new();
        assert!(tracker.counts(&fs::metadata(&original).unwrap()));
        assert!(!tracker.counts(&fs::metadata(&link).unwrap()));
        assert_eq!(tracker.len(), 1);
    }
}
