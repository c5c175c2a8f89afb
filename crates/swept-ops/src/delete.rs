//! Deletion of files and directories.

use std::fs;
use std::future::Future;
use std::path::Path;

use serde::{Deserialize, Serialize};

use swept_core::{DeleteError, DeleteRequest, Deleter};
use swept_scan::measure_path;

/// How deleted items leave the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeleteMode {
    /// Remove permanently.
    #[default]
    Permanent,
    /// Move to the platform trash.
    Trash,
}

/// Deletes items from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDeleter {
    mode: DeleteMode,
}

impl FsDeleter {
    /// Create a deleter that removes items permanently.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deleter that moves items to the trash.
    pub fn with_trash() -> Self {
        Self {
            mode: DeleteMode::Trash,
        }
    }

    /// Create a deleter for the given mode.
    pub fn with_mode(mode: DeleteMode) -> Self {
        Self { mode }
    }

    /// The configured mode.
    pub fn mode(&self) -> DeleteMode {
        self.mode
    }

    /// Delete `items` in order, blocking the current thread.
    ///
    /// Each item is measured before it is removed so the reclaimed total
    /// reflects what was actually freed. Items that no longer exist are
    /// skipped. The first failure stops the run.
    pub fn delete_blocking(&self, items: &[DeleteRequest]) -> Result<u64, DeleteError> {
        let mut reclaimed: u64 = 0;

        for item in items {
            let path = item.path.as_path();
            let meta = match fs::symlink_metadata(path) {
                Ok(m) => m,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Skipping missing item");
                    continue;
                }
                Err(err) => return Err(DeleteError::io(path, err)),
            };

            let size = measure_path(path, false).unwrap_or(0);
            self.remove(path, meta.is_dir())?;
            reclaimed += size;

            tracing::debug!(path = %path.display(), bytes = size, mode = ?self.mode, "Deleted item");
        }

        Ok(reclaimed)
    }

    fn remove(&self, path: &Path, is_dir: bool) -> Result<(), DeleteError> {
        match self.mode {
            DeleteMode::Trash => trash::delete(path).map_err(|e| DeleteError::Other {
                message: format!("Failed to trash {}: {}", path.display(), e),
            }),
            DeleteMode::Permanent if is_dir => {
                fs::remove_dir_all(path).map_err(|e| DeleteError::io(path, e))
            }
            DeleteMode::Permanent => fs::remove_file(path).map_err(|e| DeleteError::io(path, e)),
        }
    }
}

impl Deleter for FsDeleter {
    fn delete_items(&self, items: Vec<DeleteRequest>) -> impl Future<Output = Result<u64, DeleteError>> + Send {
        let deleter = *self;
        async move {
            // Perform deletion in blocking task to not block the async runtime
            tokio::task::spawn_blocking(move || deleter.delete_blocking(&items))
                .await
                .unwrap_or_else(|e| {
                    Err(DeleteError::Other {
                        message: e.to_string(),
                    })
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_delete_file_and_directory() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("cache")).unwrap();
        fs::write(root.join("cache/blob"), vec![0u8; 100]).unwrap();
        fs::write(root.join("log.txt"), vec![0u8; 20]).unwrap();

        let items = vec![
            DeleteRequest::new(root.join("cache")),
            DeleteRequest::new(root.join("log.txt")),
        ];
        let reclaimed = FsDeleter::new().delete_blocking(&items).unwrap();

        assert_eq!(reclaimed, 120);
        assert!(!root.join("cache").exists());
        assert!(!root.join("log.txt").exists());
    }

    #[test]
    fn test_missing_items_are_skipped() {
        let temp = TempDir::new().unwrap();
        let items = vec![DeleteRequest::new(temp.path().join("ghost"))];
        assert_eq!(FsDeleter::new().delete_blocking(&items).unwrap(), 0);
    }
}
