//! Error types for the codec module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::Operation;
use crate::process::ProcessError;
use crate::tags::TagError;

/// Errors that can occur in a codec plugin operation.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Launch or exit failure of the external program.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// Quality index outside the plugin's table.
    #[error("Invalid quality {quality} for {codec}: expected 0..={max}")]
    InvalidQuality { codec: String, quality: u8, max: u8 },

    /// Tags could not be read from the file.
    #[error("Failed to read tags from {path}: {reason}")]
    TagRead { path: PathBuf, reason: String },

    /// Tags could not be written to the file.
    #[error("Failed to write tags to {path}: {reason}")]
    TagWrite { path: PathBuf, reason: String },

    /// The plugin does not implement the requested operation.
    #[error("{codec} does not support {operation}")]
    Unsupported { codec: String, operation: Operation },

    /// An existing target file could not be removed.
    #[error("Failed to remove existing file: {path}")]
    RemoveExisting {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TagError> for CodecError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::Read { path, reason } => Self::TagRead { path, reason },
            TagError::Write { path, reason } => Self::TagWrite { path, reason },
        }
    }
}

impl CodecError {
    /// Creates an unsupported-operation error.
    pub fn unsupported(codec: impl Into<String>, operation: Operation) -> Self {
        Self::Unsupported {
            codec: codec.into(),
            operation,
        }
    }

    /// Whether the external program never started.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, Self::Process(e) if e.is_launch_failure())
    }

    /// Whether the external program ran and exited unsuccessfully.
    pub fn is_conversion_failure(&self) -> bool {
        matches!(self, Self::Process(ProcessError::Conversion { .. }))
    }

    /// Whether this is a tag read or write failure.
    pub fn is_tag_failure(&self) -> bool {
        matches!(self, Self::TagRead { .. } | Self::TagWrite { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_error_conversion() {
        let err: CodecError = TagError::read("/a.flac", "no container").into();
        assert!(matches!(err, CodecError::TagRead { .. }));
        assert!(err.is_tag_failure());

        let err: CodecError = TagError::write("/a.mp3", "read-only").into();
        assert!(matches!(err, CodecError::TagWrite { .. }));
    }

    #[test]
    fn test_classification() {
        let launch: CodecError = ProcessError::launch(
            "lame",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        )
        .into();
        assert!(launch.is_launch_failure());
        assert!(!launch.is_conversion_failure());

        let conversion: CodecError = ProcessError::Conversion {
            program: "lame".to_string(),
            code: Some(1),
        }
        .into();
        assert!(conversion.is_conversion_failure());
        assert!(!conversion.is_launch_failure());
    }

    #[test]
    fn test_unsupported_display() {
        let err = CodecError::unsupported("mp3", Operation::Decode);
        assert_eq!(err.to_string(), "mp3 does not support decode");
    }
}
