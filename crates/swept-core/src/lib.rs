//! Core types and traits for swept.
//!
//! This crate provides the data structures shared by the whole workspace:
//! directory entries and listings, the immutable [`PathSet`], error types,
//! session configuration, and the collaborator traits the scan engine
//! consumes ([`Enumerator`], [`SizeComputer`], [`Deleter`]).

mod backend;
mod config;
mod entry;
mod error;
mod listing;
mod path_set;

pub use backend::{DeleteRequest, Deleter, Enumerator, SizeComputer};
pub use config::{SessionConfig, SessionConfigBuilder, DEFAULT_BATCH_SIZE};
pub use entry::{Entry, EntryId, SizeResult};
pub use error::{DeleteError, EnumerateError, SessionError, SizeError};
pub use listing::{sort_entries_by_size, ScanResult};
pub use path_set::PathSet;
