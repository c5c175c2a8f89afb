//! Bounded-concurrency sizing of a listing's directories.

use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use futures::FutureExt;
use tokio::sync::mpsc;

use swept_core::{Entry, SizeComputer, SizeResult};

use crate::event::SessionEvent;
use crate::generation::{GenerationToken, ScanTicket};

/// Split the directory entries of a listing into size batches, in listing order.
///
/// Files never need sizing and are left out. A `batch_size` of 0 is
/// treated as 1.
pub fn plan_batches(entries: &[Entry], batch_size: usize) -> Vec<Vec<PathBuf>> {
    let directories: Vec<PathBuf> = entries
        .iter()
        .filter(|e| e.is_dir)
        .map(|e| e.path.clone())
        .collect();

    directories
        .chunks(batch_size.max(1))
        .map(<[PathBuf]>::to_vec)
        .collect()
}

/// Sizes directories in consecutive batches.
///
/// Requests within a batch run concurrently; the next batch starts only
/// after every request of the previous one has settled. The generation is
/// checked before each batch is issued and again after it settles, and a
/// superseded run stops without reporting further.
pub(crate) struct BatchSizeScheduler<S> {
    sizer: Arc<S>,
    token: GenerationToken,
    batch_size: usize,
    events: mpsc::Sender<SessionEvent>,
}

impl<S: SizeComputer> BatchSizeScheduler<S> {
    pub(crate) fn new(
        sizer: Arc<S>,
        token: GenerationToken,
        batch_size: usize,
        events: mpsc::Sender<SessionEvent>,
    ) -> Self {
        Self {
            sizer,
            token,
            batch_size,
            events,
        }
    }

    /// Size the directories among `entries` on a background task.
    pub(crate) fn spawn(self, entries: &[Entry], ticket: ScanTicket) {
        let batches = plan_batches(entries, self.batch_size);
        tokio::spawn(self.run(batches, ticket));
    }

    async fn run(self, batches: Vec<Vec<PathBuf>>, ticket: ScanTicket) {
        let total = batches.len();
        tracing::debug!(generation = %ticket.generation, batches = total, "Sizing directories");

        for (index, batch) in batches.into_iter().enumerate() {
            if !ticket.is_current(&self.token) {
                tracing::debug!(generation = %ticket.generation, batch = index, "Sizing superseded");
                break;
            }

            let started = SessionEvent::BatchStarted {
                ticket: ticket.clone(),
                paths: batch.clone(),
            };
            if self.events.send(started).await.is_err() {
                return;
            }

            let settled = join_all(batch.iter().map(|path| self.size_one(path))).await;

            if !ticket.is_current(&self.token) {
                tracing::debug!(generation = %ticket.generation, batch = index, "Sizing superseded");
                break;
            }

            let failed = settled.iter().filter(|(_, ok)| !ok).count();
            let results = settled.into_iter().map(|(result, _)| result).collect();
            let sized = SessionEvent::BatchSized {
                ticket: ticket.clone(),
                results,
                failed,
            };
            if self.events.send(sized).await.is_err() {
                return;
            }
        }

        let _ = self.events.send(SessionEvent::SizingFinished { ticket }).await;
    }

    /// Size one path. A failure or a panicking sizer counts as size 0.
    async fn size_one(&self, path: &Path) -> (SizeResult, bool) {
        let outcome = AssertUnwindSafe(async { self.sizer.compute_size(path).await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(result)) => (SizeResult::new(path, result.size), true),
            Ok(Err(e)) => {
                tracing::debug!(path = %path.display(), error = %e, "Size computation failed, counting as 0");
                (SizeResult::zero(path), false)
            }
            Err(_) => {
                tracing::warn!(path = %path.display(), "Size computation panicked, counting as 0");
                (SizeResult::zero(path), false)
            }
        }
    }
}
