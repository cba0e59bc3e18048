//! Pipeline orchestrator: one source file to one destination file.
//!
//! A job goes through three steps:
//!
//! 1. The source plugin decodes, either into an intermediate WAV file in the
//!    temp directory or straight into a pipe.
//! 2. The target plugin encodes from that file or pipe.
//! 3. Once the encoder exited successfully, tags are copied from the source
//!    file to the destination.
//!
//! Conversion failures ([`PipelineError::Codec`]) and tag failures
//! ([`PipelineError::TagCopy`]) are kept apart; the latter means the audio
//! itself was converted.
//!
//! # Example
//!
//! ```ignore
//! use transcoder_core::config::load_config;
//! use transcoder_core::pipeline::{FileJob, Pipeline};
//!
//! let config = load_config(Path::new("transcoder.toml"))?;
//! let pipeline = Pipeline::from_config(&config);
//! let report = pipeline
//!     .run(FileJob::new("job-1", "/music/01.flac", "/out/01.mp3"))
//!     .await?;
//! println!("Converted in {} ms, {} tags", report.duration_ms, report.tags_copied);
//! ```

mod error;
mod runner;
mod types;

pub use error::PipelineError;
pub use runner::Pipeline;
pub use types::{
    FileJob, PipelineConfig, PipelineMode, PipelineReport, Stage, DEFAULT_NICENESS,
    DEFAULT_QUALITY,
};
