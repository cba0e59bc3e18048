//! Codec plugins for decoding and encoding audio with external tools.
//!
//! Each format is a [`CodecPlugin`] that knows how to build the command line
//! of its decoder or encoder. The trait's provided methods remove stale
//! targets, launch through the shared [`ProcessRunner`](crate::process::ProcessRunner)
//! and route tag access through the [`TagBridge`](crate::tags::TagBridge).
//!
//! # Built-in formats
//!
//! - FLAC (`flac`): source and output, no quality table
//! - MP3 (`lame`): output only, constant bitrate presets
//! - AAC (`afconvert`): output only, streamed input goes through the helper
//!
//! # Example
//!
//! ```ignore
//! use transcoder_core::codec::{CodecRegistry, EncodeSource, ToolPaths};
//! use transcoder_core::process::OutputSink;
//! use transcoder_core::tags::LoftyTagBridge;
//!
//! let registry = CodecRegistry::with_builtin(&ToolPaths::default(), Arc::new(LoftyTagBridge::new()));
//! let flac = registry.get("flac").unwrap();
//! let mp3 = registry.get("mp3").unwrap();
//!
//! let mut decoder = flac.decode_stream(Path::new("song.flac"), 10).await?;
//! let pcm = decoder.take_output().unwrap();
//! let encoder = mp3
//!     .encode(Path::new("song.mp3"), EncodeSource::Stream(pcm), 2, 10, OutputSink::Inherit)
//!     .await?;
//! decoder.finish().await?;
//! encoder.finish().await?;
//! ```

mod aac;
mod config;
mod context;
mod error;
mod flac;
mod helper;
mod mp3;
mod quality;
mod registry;
mod traits;
mod types;

pub use aac::AacPlugin;
pub use config::ToolPaths;
pub use context::{remove_existing, CodecContext};
pub use error::CodecError;
pub use flac::FlacPlugin;
pub use helper::{helper_invocation, HelperMode, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER};
pub use mp3::Mp3CbrPlugin;
pub use quality::{QualityParams, QualityTable, AAC_QUALITY, MP3_CBR_QUALITY};
pub use registry::CodecRegistry;
pub use traits::CodecPlugin;
pub use types::{Capabilities, EncodeInput, EncodeSource, Operation, PluginRole};
