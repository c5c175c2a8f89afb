//! Filesystem collaborators for swept.
//!
//! This crate provides [`FsScanner`], the local-disk implementation of the
//! [`Enumerator`] and [`SizeComputer`] traits:
//!
//! - **Fast listing** of a directory's immediate children, with files sized
//!   and subdirectories left at 0
//! - **Recursive sizing** of one path at a time via jwalk
//! - **Hardlink detection** so a file linked twice is counted once
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use swept_scan::FsScanner;
//!
//! let scanner = FsScanner::new();
//! let listing = scanner.list_dir(Path::new("/path/to/list")).unwrap();
//!
//! for entry in listing.directories() {
//!     let size = scanner.measure(&entry.path).unwrap_or(0);
//!     println!("{}: {} bytes", entry.name, size);
//! }
//! ```

mod inode;
mod scanner;

pub use inode::{InodeKey, InodeTracker};
pub use scanner::{measure_path, FsScanner};

// Re-export core types for convenience
pub use swept_core::{
    Entry, EntryId, EnumerateError, Enumerator, ScanResult, SizeComputer, SizeError, SizeResult,
};
