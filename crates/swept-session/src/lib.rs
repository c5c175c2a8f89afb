//! Scan coordination for swept.
//!
//! A [`ScanSession`] shows a directory in two phases. First its immediate
//! children are listed, with directories at size 0 and files at their real
//! size. Then the directories are sized in small concurrent batches, and
//! each batch is merged into the listing as it settles, keeping it sorted
//! by size.
//!
//! Every navigation starts a new [`Generation`]. Background work carries a
//! [`ScanTicket`] naming its generation and target directory, and results
//! from a superseded generation are dropped.
//!
//! # Example
//!
//! ```no_run
//! use swept_core::SessionConfig;
//! use swept_ops::FsDeleter;
//! use swept_scan::FsScanner;
//! use swept_session::{Collaborators, ScanSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let collaborators = Collaborators::new(FsScanner::new(), FsScanner::new(), FsDeleter::new());
//! let mut session = ScanSession::new(SessionConfig::default(), collaborators);
//!
//! session.navigate("/home/user")?;
//! session.settle().await;
//!
//! if let Some(listing) = session.current() {
//!     println!("{} bytes in {} entries", listing.total_size, listing.len());
//! }
//! # Ok(())
//! # }
//! ```

mod constants;
mod event;
mod generation;
mod merger;
mod scheduler;
mod selection;
mod session;
mod tree_cache;

pub use constants::SESSION_CHANNEL_SIZE;
pub use event::SessionUpdate;
pub use generation::{Generation, GenerationToken, ScanTicket};
pub use merger::{merge, MergeOutcome};
pub use scheduler::plan_batches;
pub use selection::{SelectionModel, SelectionState};
pub use session::{Collaborators, ScanSession, SessionSnapshot};
pub use tree_cache::TreeCache;

// Re-export core types for convenience
pub use swept_core::{Entry, PathSet, ScanResult, SessionConfig, SessionError, SizeResult};
