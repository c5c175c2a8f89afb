//! Messages between background work and the session.

use std::path::PathBuf;
use std::sync::Arc;

use swept_core::{DeleteError, EnumerateError, ScanResult, SessionError, SizeResult};

use crate::generation::ScanTicket;

/// Completion of a background job, delivered to the session's event loop.
#[derive(Debug)]
pub(crate) enum SessionEvent {
    /// Listing of the navigation target finished.
    Listed {
        ticket: ScanTicket,
        result: Result<ScanResult, EnumerateError>,
    },
    /// Listing of an expanded subdirectory finished.
    ChildrenListed {
        ticket: ScanTicket,
        result: Result<ScanResult, EnumerateError>,
    },
    /// A size batch was issued.
    BatchStarted { ticket: ScanTicket, paths: Vec<PathBuf> },
    /// A size batch settled.
    BatchSized {
        ticket: ScanTicket,
        results: Vec<SizeResult>,
        failed: usize,
    },
    /// The scheduler has no more batches for this ticket.
    SizingFinished { ticket: ScanTicket },
    /// A deletion request finished.
    Deleted { result: Result<u64, DeleteError> },
}

/// A visible state change, reported by
/// [`ScanSession::next_update`](crate::ScanSession::next_update).
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// A new listing is displayed.
    Listed {
        /// Directory that was listed.
        path: PathBuf,
        /// Number of entries.
        entries: usize,
    },
    /// Listing the navigation target failed; the previous listing stays.
    NavigationFailed {
        /// Directory that could not be listed.
        path: PathBuf,
        /// Why.
        error: Arc<SessionError>,
    },
    /// An expanded subdirectory's children are now cached.
    ChildrenListed {
        /// Expanded directory.
        path: PathBuf,
        /// Number of children.
        entries: usize,
    },
    /// A size batch is in flight; its paths are now loading.
    BatchStarted {
        /// Directories being sized.
        paths: Vec<PathBuf>,
    },
    /// A size batch was merged into the listing.
    SizesMerged {
        /// Entries whose size changed.
        updated: usize,
        /// Requests that failed and were counted as 0.
        failed: usize,
    },
    /// Every directory in the listing has been sized.
    SizingComplete {
        /// The sized directory.
        path: PathBuf,
    },
    /// The selected items were deleted and the view is being refreshed.
    Deleted {
        /// Bytes reclaimed.
        reclaimed: u64,
    },
    /// Deleting the selected items failed; the selection is kept.
    DeletionFailed {
        /// Why.
        error: Arc<SessionError>,
    },
}
