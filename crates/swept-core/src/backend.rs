//! Collaborator traits consumed by the scan engine.
//!
//! The engine never touches the filesystem itself. It lists directories,
//! sizes entries and deletes items through these traits, which keeps the
//! coordination logic testable against scripted fakes.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entry::SizeResult;
use crate::error::{DeleteError, EnumerateError, SizeError};
use crate::listing::ScanResult;

/// Lists the immediate children of a directory without sizing subdirectories.
pub trait Enumerator: Send + Sync + 'static {
    /// List `path`. Directories come back with size 0, files with their real size.
    fn enumerate(&self, path: &Path)
        -> impl Future<Output = Result<ScanResult, EnumerateError>> + Send;
}

/// Computes the recursive size of one path.
pub trait SizeComputer: Send + Sync + 'static {
    /// Size `path`.
    fn compute_size(&self, path: &Path)
        -> impl Future<Output = Result<SizeResult, SizeError>> + Send;
}

/// One item to delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    /// Path to remove.
    pub path: PathBuf,
}

impl DeleteRequest {
    /// Create a new delete request.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Removes items from disk.
pub trait Deleter: Send + Sync + 'static {
    /// Delete `items`, returning the number of bytes reclaimed.
    fn delete_items(&self, items: Vec<DeleteRequest>)
        -> impl Future<Output = Result<u64, DeleteError>> + Send;
}
