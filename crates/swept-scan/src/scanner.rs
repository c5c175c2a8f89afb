//! Filesystem-backed listing and sizing.

use std::fs;
use std::future::Future;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use compact_str::CompactString;
use jwalk::{Parallelism, WalkDir};

use swept_core::{
    Entry, EntryId, EnumerateError, Enumerator, ScanResult, SizeComputer, SizeError, SizeResult,
};

use crate::inode::InodeTracker;

/// Lists and sizes directories on the local filesystem.
///
/// Listing reads only the immediate children and never sizes a subdirectory.
/// Sizing walks a single path recursively with jwalk. Blocking work runs on
/// tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct FsScanner {
    next_id: Arc<AtomicU64>,
    follow_symlinks: bool,
}

impl FsScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self {
            next_id: Arc::new(AtomicU64::new(0)),
            follow_symlinks: false,
        }
    }

    /// Follow symbolic links while sizing directories.
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// List the immediate children of `path`, blocking the current thread.
    ///
    /// Files carry their length, directories size 0 and their child count.
    /// Symlinks and entries whose metadata cannot be read are skipped.
    /// Entries are ordered by case-insensitive name.
    pub fn list_dir(&self, path: &Path) -> Result<ScanResult, EnumerateError> {
        let metadata = fs::metadata(path).map_err(|e| EnumerateError::io(path, e))?;
        if !metadata.is_dir() {
            return Err(EnumerateError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        let dir_entries = fs::read_dir(path).map_err(|e| EnumerateError::io(path, e))?;
        let mut entries = Vec::new();

        for dir_entry in dir_entries.filter_map(Result::ok) {
            let entry_path = dir_entry.path();
            let meta = match fs::symlink_metadata(&entry_path) {
                Ok(m) => m,
                Err(err) => {
                    tracing::debug!(path = %entry_path.display(), error = %err, "Skipping unreadable entry");
                    continue;
                }
            };

            if meta.file_type().is_symlink() {
                continue;
            }

            let name: CompactString = dir_entry.file_name().to_string_lossy().as_ref().into();
            let id = EntryId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
            let modified = meta.modified().ok();

            let entry = if meta.is_dir() {
                let child_count = fs::read_dir(&entry_path).ok().map(|children| children.count());
                Entry::directory(id, name, entry_path, child_count)
            } else {
                Entry::file(id, name, entry_path, meta.len())
            };
            entries.push(entry.with_modified(modified));
        }

        entries.sort_by_cached_key(|e| e.name.to_lowercase());

        Ok(ScanResult::new(
            path,
            path.parent().map(Path::to_path_buf),
            entries,
        ))
    }

    /// Compute the recursive size of `path`, blocking the current thread.
    pub fn measure(&self, path: &Path) -> Result<u64, SizeError> {
        measure_path(path, self.follow_symlinks)
    }
}

impl Default for FsScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Enumerator for FsScanner {
    fn enumerate(&self, path: &Path) -> impl Future<Output = Result<ScanResult, EnumerateError>> + Send {
        let scanner = self.clone();
        let path = path.to_path_buf();
        async move {
            tokio::task::spawn_blocking(move || scanner.list_dir(&path))
                .await
                .unwrap_or_else(|e| {
                    Err(EnumerateError::Other {
                        message: e.to_string(),
                    })
                })
        }
    }
}

impl SizeComputer for FsScanner {
    fn compute_size(&self, path: &Path) -> impl Future<Output = Result<SizeResult, SizeError>> + Send {
        let follow_symlinks = self.follow_symlinks;
        let path = path.to_path_buf();
        async move {
            let target = path.clone();
            let size = tokio::task::spawn_blocking(move || measure_path(&target, follow_symlinks))
                .await
                .unwrap_or_else(|e| {
                    Err(SizeError::Other {
                        message: e.to_string(),
                    })
                })?;
            Ok(SizeResult::new(path, size))
        }
    }
}

/// Sum the sizes of all regular files under `path`.
///
/// A symlink at `path` counts as 0 unless links are followed. Hardlinked
/// files are counted once.
pub fn measure_path(path: &Path, follow_symlinks: bool) -> Result<u64, SizeError> {
    let meta = fs::symlink_metadata(path).map_err(|e| SizeError::io(path, e))?;

    if meta.file_type().is_symlink() && !follow_symlinks {
        return Ok(0);
    }
    if meta.is_file() {
        return Ok(meta.len());
    }

    let inode_tracker = InodeTracker::new();
    let walker = WalkDir::new(path)
        .parallelism(Parallelism::RayonDefaultPool {
            busy_timeout: Duration::from_millis(100),
        })
        .skip_hidden(false)
        .follow_links(follow_symlinks)
        .min_depth(1);

    let mut total: u64 = 0;
    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "Skipping unreadable entry while sizing");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };

        if inode_tracker.counts(&metadata) {
            total += metadata.len();
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("beta")).unwrap();
        fs::create_dir(root.join("Alpha")).unwrap();
        fs::create_dir(root.join("beta/nested")).unwrap();

        fs::write(root.join("zeta.txt"), "hello").unwrap();
        fs::write(root.join("beta/one.txt"), "world world world").unwrap();
        fs::write(root.join("beta/nested/two.txt"), "test").unwrap();
        fs::write(root.join("beta/.hidden"), "abc").unwrap();

        temp
    }

    #[test]
    fn test_list_dir_sizes_files_only() {
        let temp = create_test_tree();
        let result = FsScanner::new().list_dir(temp.path()).unwrap();

        let names: Vec<_> = result.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "zeta.txt"]);

        let beta = result.find(&temp.path().join("beta")).unwrap();
        assert!(beta.is_dir);
        assert_eq!(beta.size, 0);
        assert_eq!(beta.child_count, Some(3));

        assert_eq!(result.total_size, 5);
        assert_eq!(result.parent.as_deref(), temp.path().parent());
    }

    #[test]
    fn test_measure_counts_hidden_and_nested() {
        let temp = create_test_tree();
        let size = measure_path(&temp.path().join("beta"), false).unwrap();
        assert_eq!(size, 17 + 4 + 3);
    }

    #[test]
    fn test_measure_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        assert!(measure_path(&temp.path().join("nope"), false).is_err());
    }
}
