//! The scan session: navigation, expansion, selection and deletion.

use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;

use swept_core::{
    DeleteError, DeleteRequest, Deleter, EnumerateError, Enumerator, PathSet, ScanResult,
    SessionConfig, SessionError, SizeComputer,
};

use crate::constants::SESSION_CHANNEL_SIZE;
use crate::event::{SessionEvent, SessionUpdate};
use crate::generation::{Generation, GenerationToken, ScanTicket};
use crate::merger::{self, MergeOutcome};
use crate::scheduler::BatchSizeScheduler;
use crate::selection::{SelectionModel, SelectionState};
use crate::tree_cache::TreeCache;

/// The external operations a session drives.
pub struct Collaborators<E, S, D> {
    /// Lists directories.
    pub enumerator: Arc<E>,
    /// Sizes directories.
    pub sizer: Arc<S>,
    /// Deletes items.
    pub deleter: Arc<D>,
}

impl<E, S, D> Collaborators<E, S, D> {
    /// Bundle three collaborators.
    pub fn new(enumerator: E, sizer: S, deleter: D) -> Self {
        Self {
            enumerator: Arc::new(enumerator),
            sizer: Arc::new(sizer),
            deleter: Arc::new(deleter),
        }
    }
}

impl<E, S, D> Clone for Collaborators<E, S, D> {
    fn clone(&self) -> Self {
        Self {
            enumerator: Arc::clone(&self.enumerator),
            sizer: Arc::clone(&self.sizer),
            deleter: Arc::clone(&self.deleter),
        }
    }
}

/// A point-in-time copy of everything a view renders.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Generation at the time of the snapshot.
    pub generation: Generation,
    /// Most recently requested navigation target.
    pub current_path: Option<PathBuf>,
    /// Displayed listing.
    pub current: Option<ScanResult>,
    /// Cached children of listed directories.
    pub tree_cache: TreeCache,
    /// Directories whose size request is in flight.
    pub loading: PathSet,
    /// Directories shown expanded.
    pub expanded: PathSet,
    /// Selected paths.
    pub selection: SelectionModel,
    /// Whether the navigation target is still being listed.
    pub enumerating: bool,
    /// Last navigation or deletion error.
    pub last_error: Option<Arc<SessionError>>,
}

/// Coordinates listing, sizing, expansion, selection and deletion for one
/// browsing session.
///
/// All state lives here and changes only through `&mut self`. Background
/// jobs report back over a channel; the owner drives the session by
/// awaiting [`next_update`](Self::next_update) (or [`settle`](Self::settle)),
/// which applies one completion at a time. Completions from a superseded
/// generation are dropped without touching state.
pub struct ScanSession<E, S, D> {
    config: SessionConfig,
    collaborators: Collaborators<E, S, D>,
    token: GenerationToken,

    current_path: Option<PathBuf>,
    current: Option<ScanResult>,
    tree_cache: TreeCache,
    loading: PathSet,
    expanded: PathSet,
    selection: SelectionModel,
    last_error: Option<Arc<SessionError>>,

    enumerating: bool,
    sizing: bool,
    pending_children: PathSet,
    deletions: usize,

    events_tx: mpsc::Sender<SessionEvent>,
    events_rx: mpsc::Receiver<SessionEvent>,
}

impl<E, S, D> ScanSession<E, S, D>
where
    E: Enumerator,
    S: SizeComputer,
    D: Deleter,
{
    /// Create an idle session. Nothing is listed until the first navigation.
    pub fn new(config: SessionConfig, collaborators: Collaborators<E, S, D>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(SESSION_CHANNEL_SIZE);
        Self {
            config,
            collaborators,
            token: GenerationToken::new(),
            current_path: None,
            current: None,
            tree_cache: TreeCache::new(),
            loading: PathSet::new(),
            expanded: PathSet::new(),
            selection: SelectionModel::new(),
            last_error: None,
            enumerating: false,
            sizing: false,
            pending_children: PathSet::new(),
            deletions: 0,
            events_tx,
            events_rx,
        }
    }

    // ==================== Navigation ====================

    /// Start listing `path`. Returns as soon as the listing job is issued.
    ///
    /// Begins a new generation: selection, expansion, loading marks, the
    /// tree cache and the last error are cleared, and every job of the
    /// previous generation is orphaned. The current listing stays on
    /// display until the new one arrives.
    pub fn navigate(&mut self, path: impl Into<PathBuf>) -> Result<Generation, SessionError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(SessionError::EmptyPath);
        }

        let generation = self.token.advance();
        tracing::info!(%generation, path = %path.display(), "Navigating");

        self.current_path = Some(path.clone());
        self.selection = self.selection.cleared();
        self.expanded = PathSet::new();
        self.loading = PathSet::new();
        self.pending_children = PathSet::new();
        self.tree_cache.clear();
        self.last_error = None;
        self.enumerating = true;
        self.sizing = false;

        self.spawn_listing(ScanTicket::new(generation, path), false);
        Ok(generation)
    }

    /// List the current path again. Does nothing before the first navigation.
    pub fn refresh(&mut self) -> Result<Option<Generation>, SessionError> {
        match self.current_path.clone() {
            Some(path) => self.navigate(path).map(Some),
            None => Ok(None),
        }
    }

    /// Navigate to the displayed listing's parent, if it has one.
    pub fn go_up(&mut self) -> Result<Option<Generation>, SessionError> {
        match self.current.as_ref().and_then(|c| c.parent.clone()) {
            Some(parent) => self.navigate(parent).map(Some),
            None => Ok(None),
        }
    }

    /// Navigate to the configured home directory.
    pub fn go_home(&mut self) -> Result<Generation, SessionError> {
        self.navigate(self.config.home.clone())
    }

    // ==================== Expansion ====================

    /// Toggle whether `path` is shown expanded. Returns the new state.
    ///
    /// Children not yet cached are listed in the background under the
    /// current generation. A directory already being listed is not listed
    /// twice. Listing failures are logged, never surfaced.
    pub fn expand(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        self.expanded = self.expanded.toggled(&path);

        if !self.tree_cache.contains(&path) && !self.pending_children.contains(&path) {
            self.pending_children = self.pending_children.with(path.clone());
            self.spawn_listing(ScanTicket::new(self.token.current(), path.clone()), true);
        }

        self.expanded.contains(&path)
    }

    // ==================== Selection ====================

    /// Flip whether `path` is selected.
    pub fn toggle_select(&mut self, path: &Path) {
        self.selection = self.selection.toggle(path);
    }

    /// Select every entry of the current listing, or deselect them all if
    /// they already are. Returns the resulting state.
    pub fn toggle_select_all(&mut self) -> SelectionState {
        let Some(current) = &self.current else {
            return SelectionState::Nothing;
        };
        let candidates = || current.entries.iter().map(|e| e.path.as_path());

        self.selection = self.selection.toggle_all(candidates());
        self.selection.state(candidates())
    }

    /// Selection state against the current listing.
    pub fn selection_state(&self) -> SelectionState {
        match &self.current {
            Some(current) => self.selection.state(current.entries.iter().map(|e| e.path.as_path())),
            None => SelectionState::Nothing,
        }
    }

    /// Combined size of the selected entries of the current listing.
    pub fn selected_size(&self) -> u64 {
        self.current
            .as_ref()
            .map_or(0, |c| self.selection.selected_size(&c.entries))
    }

    // ==================== Deletion ====================

    /// Delete every selected path in the background. Returns how many
    /// items were requested.
    ///
    /// On success the selection is cleared and the current path is listed
    /// again. On failure the error is recorded and the selection is kept.
    pub fn request_delete(&mut self) -> Result<usize, SessionError> {
        if self.selection.is_empty() {
            return Err(SessionError::NothingSelected);
        }

        let items: Vec<DeleteRequest> = self.selection.paths().iter().map(DeleteRequest::new).collect();
        let count = items.len();
        tracing::info!(items = count, "Deleting selection");

        let deleter = Arc::clone(&self.collaborators.deleter);
        let tx = self.events_tx.clone();
        self.deletions += 1;
        tokio::spawn(async move {
            let result = AssertUnwindSafe(async { deleter.delete_items(items).await })
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(DeleteError::Other {
                        message: "Deletion task panicked".to_string(),
                    })
                });
            let _ = tx.send(SessionEvent::Deleted { result }).await;
        });

        Ok(count)
    }

    // ==================== Driving ====================

    /// Wait for the next background completion and apply it.
    ///
    /// Returns `None` when the completion changed nothing visible, such as
    /// a stale result or a failed expansion. Waits indefinitely if nothing
    /// is in flight; check [`is_busy`](Self::is_busy) first.
    pub async fn next_update(&mut self) -> Option<SessionUpdate> {
        let event = self.events_rx.recv().await?;
        self.apply(event)
    }

    /// Apply completions until no job of the current generation is in
    /// flight. Returns the updates applied along the way.
    pub async fn settle(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while self.is_busy() {
            if let Some(update) = self.next_update().await {
                updates.push(update);
            }
        }
        updates
    }

    /// Apply every completion already delivered, without waiting.
    pub fn drain_pending(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(update) = self.apply(event) {
                updates.push(update);
            }
        }
        updates
    }

    fn apply(&mut self, event: SessionEvent) -> Option<SessionUpdate> {
        match event {
            SessionEvent::Listed { ticket, result } => {
                if !self.accepts(&ticket) {
                    return None;
                }
                self.enumerating = false;

                match result {
                    Ok(listing) => {
                        let path = listing.path.clone();
                        let entries = listing.len();
                        tracing::info!(
                            generation = %ticket.generation,
                            path = %path.display(),
                            entries,
                            "Listed directory"
                        );

                        self.tree_cache.put(path.clone(), listing.entries.clone());
                        self.sizing = true;
                        BatchSizeScheduler::new(
                            Arc::clone(&self.collaborators.sizer),
                            self.token.clone(),
                            self.config.batch_size,
                            self.events_tx.clone(),
                        )
                        .spawn(&listing.entries, ScanTicket::new(ticket.generation, path.clone()));
                        self.current = Some(listing);

                        Some(SessionUpdate::Listed { path, entries })
                    }
                    Err(e) => {
                        tracing::warn!(path = %ticket.target.display(), error = %e, "Failed to list directory");
                        let error = Arc::new(SessionError::from(e));
                        self.last_error = Some(Arc::clone(&error));
                        Some(SessionUpdate::NavigationFailed {
                            path: ticket.target,
                            error,
                        })
                    }
                }
            }

            SessionEvent::ChildrenListed { ticket, result } => {
                if !self.accepts(&ticket) {
                    return None;
                }
                self.pending_children = self.pending_children.without(&ticket.target);

                match result {
                    // Listed meanwhile by navigation; its entry may already hold merged sizes.
                    Ok(_) if self.tree_cache.contains(&ticket.target) => {
                        tracing::debug!(path = %ticket.target.display(), "Children already cached");
                        None
                    }
                    Ok(listing) => {
                        let entries = listing.len();
                        self.tree_cache.put(ticket.target.clone(), listing.entries);
                        Some(SessionUpdate::ChildrenListed {
                            path: ticket.target,
                            entries,
                        })
                    }
                    Err(e) => {
                        tracing::warn!(path = %ticket.target.display(), error = %e, "Failed to expand directory");
                        None
                    }
                }
            }

            SessionEvent::BatchStarted { ticket, paths } => {
                if !self.accepts(&ticket) {
                    return None;
                }
                self.loading = self.loading.marked(paths.iter().cloned());
                Some(SessionUpdate::BatchStarted { paths })
            }

            SessionEvent::BatchSized {
                ticket,
                results,
                failed,
            } => {
                let outcome = merger::merge(
                    &mut self.current,
                    &mut self.tree_cache,
                    &ticket,
                    &results,
                    &self.token,
                );
                match outcome {
                    MergeOutcome::Stale => None,
                    MergeOutcome::Applied { updated } => {
                        self.loading = self.loading.unmarked(results.iter().map(|r| &r.path));
                        if failed > 0 {
                            tracing::debug!(failed, "Some sizes could not be computed");
                        }
                        Some(SessionUpdate::SizesMerged { updated, failed })
                    }
                }
            }

            SessionEvent::SizingFinished { ticket } => {
                if !self.accepts(&ticket) {
                    return None;
                }
                self.sizing = false;
                tracing::info!(path = %ticket.target.display(), "Sizing complete");
                Some(SessionUpdate::SizingComplete { path: ticket.target })
            }

            SessionEvent::Deleted { result } => {
                self.deletions = self.deletions.saturating_sub(1);

                match result {
                    Ok(reclaimed) => {
                        tracing::info!(reclaimed, "Deletion complete");
                        self.selection = self.selection.cleared();
                        if let Err(e) = self.refresh() {
                            tracing::warn!(error = %e, "Failed to refresh after deletion");
                        }
                        Some(SessionUpdate::Deleted { reclaimed })
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Deletion failed");
                        let error = Arc::new(SessionError::from(e));
                        self.last_error = Some(Arc::clone(&error));
                        Some(SessionUpdate::DeletionFailed { error })
                    }
                }
            }
        }
    }

    fn accepts(&self, ticket: &ScanTicket) -> bool {
        let current = ticket.is_current(&self.token);
        if !current {
            tracing::debug!(generation = %ticket.generation, "Discarding stale result");
        }
        current
    }

    fn spawn_listing(&self, ticket: ScanTicket, children: bool) {
        let enumerator = Arc::clone(&self.collaborators.enumerator);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = AssertUnwindSafe(async { enumerator.enumerate(&ticket.target).await })
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(EnumerateError::Other {
                        message: format!("Listing {} panicked", ticket.target.display()),
                    })
                });
            let event = if children {
                SessionEvent::ChildrenListed { ticket, result }
            } else {
                SessionEvent::Listed { ticket, result }
            };
            let _ = tx.send(event).await;
        });
    }
}

impl<E, S, D> ScanSession<E, S, D> {
    /// Session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The current generation.
    pub fn generation(&self) -> Generation {
        self.token.current()
    }

    /// The most recently requested navigation target.
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// The displayed listing.
    pub fn current(&self) -> Option<&ScanResult> {
        self.current.as_ref()
    }

    /// Cached children of listed directories.
    pub fn tree_cache(&self) -> &TreeCache {
        &self.tree_cache
    }

    /// Directories whose size request is in flight.
    pub fn loading(&self) -> &PathSet {
        &self.loading
    }

    /// Directories shown expanded.
    pub fn expanded(&self) -> &PathSet {
        &self.expanded
    }

    /// The selection.
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// The last navigation or deletion error, until the next navigation.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_deref()
    }

    /// Check whether the navigation target is still being listed.
    pub fn is_enumerating(&self) -> bool {
        self.enumerating
    }

    /// Check whether any job of the current generation, or any deletion,
    /// is still in flight.
    pub fn is_busy(&self) -> bool {
        self.enumerating || self.sizing || !self.pending_children.is_empty() || self.deletions > 0
    }

    /// Copy out the rendered state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generation: self.generation(),
            current_path: self.current_path.clone(),
            current: self.current.clone(),
            tree_cache: self.tree_cache.clone(),
            loading: self.loading.clone(),
            expanded: self.expanded.clone(),
            selection: self.selection.clone(),
            enumerating: self.enumerating,
            last_error: self.last_error.clone(),
        }
    }
}
