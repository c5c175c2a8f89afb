//! Multi-select over the current listing.

use std::path::Path;

use strum::Display;

use swept_core::{Entry, PathSet};

/// How much of a candidate set is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SelectionState {
    /// No candidate is selected.
    Nothing,
    /// Some but not all candidates are selected.
    Partial,
    /// Every candidate is selected.
    All,
}

/// The set of selected paths.
///
/// Every change produces a new model; the previous one is never mutated,
/// so observers holding it can detect change by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    selected: PathSet,
}

impl SelectionModel {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected paths.
    pub fn paths(&self) -> &PathSet {
        &self.selected
    }

    /// Check whether `path` is selected.
    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected.contains(path)
    }

    /// Number of selected paths.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Flip one path's membership.
    pub fn toggle(&self, path: &Path) -> Self {
        Self {
            selected: self.selected.toggled(path),
        }
    }

    /// Deselect every candidate if all are selected, otherwise select them all.
    ///
    /// Selected paths outside `candidates` are left alone.
    pub fn toggle_all<'a, I>(&self, candidates: I) -> Self
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let candidates: Vec<&Path> = candidates.into_iter().collect();
        let selected = if candidates.iter().all(|p| self.selected.contains(p)) {
            self.selected.unmarked(candidates)
        } else {
            self.selected.marked(candidates)
        };
        Self { selected }
    }

    /// An empty selection.
    pub fn cleared(&self) -> Self {
        Self::new()
    }

    /// Classify the selection against `candidates`.
    pub fn state<'a, I>(&self, candidates: I) -> SelectionState
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let (total, selected) = candidates.into_iter().fold((0usize, 0usize), |(total, selected), p| {
            (total + 1, selected + usize::from(self.selected.contains(p)))
        });

        match selected {
            0 => SelectionState::Nothing,
            n if n == total => SelectionState::All,
            _ => SelectionState::Partial,
        }
    }

    /// Selected members of `entries`.
    pub fn selected_entries<'e>(&self, entries: &'e [Entry]) -> impl Iterator<Item = &'e Entry> {
        entries.iter().filter(|e| self.selected.contains(&e.path))
    }

    /// Number of `entries` that are selected.
    pub fn selected_count(&self, entries: &[Entry]) -> usize {
        self.selected_entries(entries).count()
    }

    /// Combined size of the selected `entries`, as of their current sizes.
    pub fn selected_size(&self, entries: &[Entry]) -> u64 {
        self.selected_entries(entries).map(|e| e.size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swept_core::EntryId;

    fn entries() -> Vec<Entry> {
        vec![
            Entry::directory(EntryId::new(1), "a", "/r/a", Some(0)).resized(100),
            Entry::file(EntryId::new(2), "b", "/r/b", 20),
            Entry::file(EntryId::new(3), "c", "/r/c", 3),
        ]
    }

    fn paths(entries: &[Entry]) -> impl Iterator<Item = &Path> {
        entries.iter().map(|e| e.path.as_path())
    }

    #[test]
    fn test_toggle_returns_new_model() {
        let empty = SelectionModel::new();
        let one = empty.toggle(Path::new("/r/a"));

        assert!(empty.is_empty());
        assert!(one.is_selected(Path::new("/r/a")));
        assert!(!one.paths().same_as(empty.paths()));
        assert!(one.toggle(Path::new("/r/a")).is_empty());
    }

    #[test]
    fn test_toggle_all_twice_restores_state() {
        let entries = entries();
        let start = SelectionModel::new().toggle(Path::new("/r/b"));

        let all = start.toggle_all(paths(&entries));
        assert_eq!(all.state(paths(&entries)), SelectionState::All);

        let none = all.toggle_all(paths(&entries));
        assert_eq!(none.state(paths(&entries)), SelectionState::Nothing);

        // From an all-selected start, two toggles land back where we began.
        assert_eq!(none.toggle_all(paths(&entries)), all);
    }

    #[test]
    fn test_toggle_all_keeps_outside_paths() {
        let entries = entries();
        let start = SelectionModel::new().toggle(Path::new("/r/a/deep"));

        let all = start.toggle_all(paths(&entries));
        let cleared = all.toggle_all(paths(&entries));

        assert!(cleared.is_selected(Path::new("/r/a/deep")));
        assert_eq!(cleared.len(), 1);
    }

    #[test]
    fn test_state_and_totals() {
        let entries = entries();
        let selection = SelectionModel::new()
            .toggle(Path::new("/r/a"))
            .toggle(Path::new("/r/c"));

        assert_eq!(selection.state(paths(&entries)), SelectionState::Partial);
        assert_eq!(selection.state(std::iter::empty()), SelectionState::Nothing);
        assert_eq!(selection.selected_count(&entries), 2);
        assert_eq!(selection.selected_size(&entries), 103);
        assert_eq!(SelectionState::Partial.to_string(), "partial");
    }

    #[test]
    fn test_cleared() {
        let selection = SelectionModel::new().toggle(Path::new("/r/a"));
        assert!(selection.cleared().is_empty());
    }
}
