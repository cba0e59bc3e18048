//! Process runner for external encoders and decoders.
//!
//! Every program is started as `nice -n <level> <program> <args...>` with its
//! standard error merged into the same sink as its standard output, so the
//! tool's own diagnostics always reach the caller untouched.
//!
//! Launching and awaiting are separate steps: [`ProcessRunner::spawn`] returns
//! a [`ProcessHandle`] immediately, which lets a caller wire the output pipe of
//! one stage into the input of the next before anything is awaited.
//!
//! # Example
//!
//! ```ignore
//! use transcoder_core::process::{Invocation, OutputSink, ProcessInput, ProcessRunner};
//!
//! let runner = ProcessRunner::default();
//! let mut decoder = runner.spawn(
//!     &Invocation::new("flac").args(["--totally-silent", "-d", "-c", "song.flac"]),
//!     10,
//!     ProcessInput::Null,
//!     OutputSink::Pipe,
//! )?;
//! let pcm = decoder.take_output().unwrap();
//! let encoder = runner.spawn(
//!     &Invocation::new("lame").args(["--preset", "insane", "-", "song.mp3"]),
//!     10,
//!     ProcessInput::Pipe(pcm),
//!     OutputSink::Inherit,
//! )?;
//! decoder.finish().await?;
//! encoder.finish().await?;
//! ```

mod error;
mod handle;
mod runner;
mod types;

pub use error::ProcessError;
pub use handle::{check_status, ProcessHandle, ProcessOutput};
pub use runner::{resolve_program, ProcessRunner, DEFAULT_NICE};
pub use types::{Invocation, OutputSink, ProcessInput};
