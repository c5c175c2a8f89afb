//! Immutable set of paths.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexSet;

/// An immutable, insertion-ordered set of paths.
///
/// Every mutation returns a new set and leaves the receiver untouched.
/// Clones share storage, so holding a snapshot is cheap and
/// [`PathSet::same_as`] tells an observer whether anything changed.
#[derive(Debug, Clone, Default)]
pub struct PathSet {
    paths: Arc<IndexSet<PathBuf>>,
}

impl PathSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check membership.
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Number of paths in the set.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.paths.iter()
    }

    /// True if both values share the same storage.
    pub fn same_as(&self, other: &PathSet) -> bool {
        Arc::ptr_eq(&self.paths, &other.paths)
    }

    /// Return a set with `path` added.
    pub fn with(&self, path: impl Into<PathBuf>) -> Self {
        self.marked(std::iter::once(path.into()))
    }

    /// Return a set with `path` removed.
    pub fn without(&self, path: &Path) -> Self {
        self.unmarked(std::iter::once(path))
    }

    /// Return a set with `path` flipped.
    pub fn toggled(&self, path: &Path) -> Self {
        if self.contains(path) {
            self.without(path)
        } else {
            self.with(path)
        }
    }

    /// Return a set with all `paths` added.
    pub fn marked<I, P>(&self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut next = (*self.paths).clone();
        next.extend(paths.into_iter().map(Into::into));
        Self {
            paths: Arc::new(next),
        }
    }

    /// Return a set with all `paths` removed.
    pub fn unmarked<I, P>(&self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut next = (*self.paths).clone();
        for path in paths {
            next.shift_remove(path.as_ref());
        }
        Self {
            paths: Arc::new(next),
        }
    }
}

impl PartialEq for PathSet {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other) || (self.len() == other.len() && self.iter().all(|p| other.contains(p)))
    }
}

impl Eq for PathSet {}

impl<P: Into<PathBuf>> FromIterator<P> for PathSet {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: Arc::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}
