//! Deletion collaborator for swept.
//!
//! [`FsDeleter`] implements the [`Deleter`](swept_core::Deleter) trait for
//! the local filesystem, either removing items permanently or moving them
//! to the platform trash. Removal runs on tokio's blocking pool.

mod delete;

pub use delete::{DeleteMode, FsDeleter};
