//! Error type shared by every fallible step of the traversal engine.
//!
//! Public node operations never surface these: they log the cause and
//! return an absent or empty result instead.

use std::io;
use thiserror::Error;

/// Result alias for capfs operations.
pub type HandleResult<T> = Result<T, HandleError>;

#[derive(Debug, Error)]
pub enum HandleError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    #[error("{name} is not a {expected}")]
    KindMismatch { name: String, expected: &'static str },

    #[error("provider error: {0}")]
    Io(#[source] io::Error),
}

impl HandleError {
    /// Map a provider error onto the taxonomy.
    pub fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => HandleError::NotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => HandleError::PermissionDenied(err.to_string()),
            io::ErrorKind::NotADirectory => HandleError::KindMismatch {
                name: err.to_string(),
                expected: "directory",
            },
            io::ErrorKind::IsADirectory => HandleError::KindMismatch {
                name: err.to_string(),
                expected: "file",
            },
            _ => HandleError::Io(err),
        }
    }

    /// True for host-provider faults, as opposed to ordinary "no result" outcomes.
    pub fn is_fault(&self) -> bool {
        matches!(self, HandleError::Io(_))
    }
}

impl From<io::Error> for HandleError {
    fn from(err: io::Error) -> Self {
        Self::from_io(err)
    }
}

/// Log an error at a public boundary, at a level matching its severity.
pub(crate) fn log_boundary(op: &str, path: &str, err: &HandleError) {
    if err.is_fault() {
        tracing::warn!(op, path, error = %err, "operation failed");
    } else {
        tracing::debug!(op, path, error = %err, "no result");
    }
}
