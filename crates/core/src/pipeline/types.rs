//! Types for the pipeline module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default niceness for spawned encoders and decoders.
pub const DEFAULT_NICENESS: i32 = 10;

/// Default quality level.
pub const DEFAULT_QUALITY: u8 = 5;

/// Settings shared by every file a [`Pipeline`](super::Pipeline) converts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source codec name. When unset, picked from the source file's extension.
    #[serde(default)]
    pub source_format: Option<String>,

    /// Target codec name. When unset, picked from the destination's extension.
    #[serde(default)]
    pub target_format: Option<String>,

    /// Index into the target codec's quality table.
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// `nice -n` level for every spawned program.
    #[serde(default = "default_niceness")]
    pub niceness: i32,

    /// Pipe the decoder straight into the encoder instead of going through a
    /// temporary file.
    #[serde(default)]
    pub streaming: bool,

    /// Keep the decoded temporary file after a file-mode conversion.
    #[serde(default)]
    pub keep_intermediate: bool,

    /// Directory for intermediate files.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

fn default_quality() -> u8 {
    DEFAULT_QUALITY
}

fn default_niceness() -> i32 {
    DEFAULT_NICENESS
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("transcoder")
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_format: None,
            target_format: None,
            quality: default_quality(),
            niceness: default_niceness(),
            streaming: false,
            keep_intermediate: false,
            temp_dir: default_temp_dir(),
        }
    }
}

impl PipelineConfig {
    pub fn with_source_format(mut self, format: impl Into<String>) -> Self {
        self.source_format = Some(format.into());
        self
    }

    pub fn with_target_format(mut self, format: impl Into<String>) -> Self {
        self.target_format = Some(format.into());
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_niceness(mut self, niceness: i32) -> Self {
        self.niceness = niceness;
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_keep_intermediate(mut self, keep: bool) -> Self {
        self.keep_intermediate = keep;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    pub fn mode(&self) -> PipelineMode {
        if self.streaming {
            PipelineMode::Streamed
        } else {
            PipelineMode::File
        }
    }
}

/// One file to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileJob {
    /// Identifier used in logs and the report.
    pub job_id: String,
    /// Source audio file.
    pub source: PathBuf,
    /// Destination file. Any existing file here is replaced.
    pub dest: PathBuf,
}

impl FileJob {
    pub fn new(
        job_id: impl Into<String>,
        source: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            source: source.into(),
            dest: dest.into(),
        }
    }
}

/// How decoded audio travels from the decoder to the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// Through an intermediate file in the temp directory.
    File,
    /// Through a pipe between the two processes.
    Streamed,
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Streamed => f.write_str("streamed"),
        }
    }
}

/// Pipeline stage a codec failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Decode,
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode => f.write_str("decode"),
            Self::Encode => f.write_str("encode"),
        }
    }
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub job_id: String,
    /// Codec the source was decoded with.
    pub source_format: String,
    /// Codec the destination was encoded with.
    pub target_format: String,
    pub dest: PathBuf,
    pub mode: PipelineMode,
    /// Wall-clock time of the whole job, tag copy included.
    pub duration_ms: u64,
    /// Number of tags written to the destination.
    pub tags_copied: usize,
}
