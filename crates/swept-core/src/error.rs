//! Error types for enumeration, sizing, deletion and the session.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from listing a directory's immediate children.
#[derive(Debug, Error)]
pub enum EnumerateError {
    /// Path not found.
    #[error("Path does not exist: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path exists but is not a directory.
    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("Cannot read directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl EnumerateError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Errors from computing the size of a single path.
///
/// These never reach the caller of the session: a failed request degrades
/// that entry's size to 0.
#[derive(Debug, Error)]
pub enum SizeError {
    /// Generic I/O error.
    #[error("Cannot size {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl SizeError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from deleting items.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("Failed to delete {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl DeleteError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Session-level errors surfaced to the view layer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Navigation was requested with an empty path.
    #[error("Cannot navigate to an empty path")]
    EmptyPath,

    /// Deletion was requested with nothing selected.
    #[error("Nothing is selected")]
    NothingSelected,

    /// Listing the requested directory failed.
    #[error(transparent)]
    Enumeration(#[from] EnumerateError),

    /// Deleting the selected items failed.
    #[error(transparent)]
    Deletion(#[from] DeleteError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_error_io() {
        let err = EnumerateError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, EnumerateError::PermissionDenied { .. }));

        let err = EnumerateError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, EnumerateError::NotFound { .. }));
    }

    #[test]
    fn test_session_error_wraps_enumeration() {
        let err: SessionError = EnumerateError::NotADirectory {
            path: PathBuf::from("/etc/hosts"),
        }
        .into();
        assert!(matches!(err, SessionError::Enumeration(_)));
        assert_eq!(err.to_string(), "Path is not a directory: /etc/hosts");
    }
}
