//! Error types for the tags module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by a tag bridge.
#[derive(Debug, Error)]
pub enum TagError {
    /// The file has no readable tag container.
    #[error("Failed to read tags from {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// The tag container could not be persisted.
    #[error("Failed to write tags to {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

impl TagError {
    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
