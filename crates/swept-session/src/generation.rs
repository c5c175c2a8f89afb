//! Generation counter and the tickets background work carries.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// One navigation's lineage of asynchronous work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The authoritative current generation, shared with background tasks.
///
/// Only the session advances it. Background work compares its own
/// generation against it at every checkpoint.
#[derive(Debug, Clone, Default)]
pub struct GenerationToken {
    current: Arc<AtomicU64>,
}

impl GenerationToken {
    /// Create a token at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current generation.
    pub fn current(&self) -> Generation {
        Generation(self.current.load(Ordering::Acquire))
    }

    /// Check whether `generation` is still current.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }

    /// Start a new generation, orphaning all work issued under older ones.
    pub fn advance(&self) -> Generation {
        Generation(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }
}

/// What a background job was issued for: the generation it belongs to and
/// the directory whose listing and cache entry it may write into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTicket {
    /// Generation the job was issued under.
    pub generation: Generation,
    /// Directory the job's results belong to.
    pub target: PathBuf,
}

impl ScanTicket {
    /// Create a new ticket.
    pub fn new(generation: Generation, target: impl Into<PathBuf>) -> Self {
        Self {
            generation,
            target: target.into(),
        }
    }

    /// Check whether this ticket's generation is still current.
    pub fn is_current(&self, token: &GenerationToken) -> bool {
        token.is_current(self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_is_monotonic() {
        let token = GenerationToken::new();
        assert_eq!(token.current(), Generation(0));

        let first = token.advance();
        let second = token.advance();
        assert!(second > first);
        assert_eq!(token.current(), second);
    }

    #[test]
    fn test_clones_share_the_counter() {
        let token = GenerationToken::new();
        let seen_by_task = token.clone();

        let ticket = ScanTicket::new(token.advance(), "/a");
        assert!(ticket.is_current(&seen_by_task));

        token.advance();
        assert!(!ticket.is_current(&seen_by_task));
    }
}
