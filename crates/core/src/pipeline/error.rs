//! Error types for the pipeline module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::Stage;
use crate::codec::CodecError;

/// Errors that can occur while converting one file.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No registered codec matches the name or extension.
    #[error("Unknown format: {format}")]
    UnknownFormat { format: String },

    /// Source and destination are the same file.
    #[error("Source and destination are the same file: {path}")]
    SameFile { path: PathBuf },

    /// Decoding or encoding failed; the destination holds no valid audio.
    #[error("{stage} failed: {source}")]
    Codec {
        stage: Stage,
        #[source]
        source: CodecError,
    },

    /// Audio was converted but its tags could not be copied.
    #[error("Tag copy failed: {source}")]
    TagCopy {
        #[source]
        source: CodecError,
    },

    /// I/O error around intermediate files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn unknown_format(format: impl Into<String>) -> Self {
        Self::UnknownFormat {
            format: format.into(),
        }
    }

    pub fn decode(source: CodecError) -> Self {
        Self::Codec {
            stage: Stage::Decode,
            source,
        }
    }

    pub fn encode(source: CodecError) -> Self {
        Self::Codec {
            stage: Stage::Encode,
            source,
        }
    }

    /// Whether the audio itself was converted successfully.
    pub fn audio_converted(&self) -> bool {
        matches!(self, Self::TagCopy { .. })
    }

    /// The failed stage, for codec failures.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Codec { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
