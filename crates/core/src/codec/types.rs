//! Types for the codec module.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::io::PipeReader;
use std::path::{Path, PathBuf};

use crate::process::ProcessInput;

/// What a plugin is used for in a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginRole {
    /// Only ever converted away from.
    Source,
    /// Only ever converted to.
    Output,
    /// Valid as both source and output.
    Bidirectional,
}

impl PluginRole {
    pub fn can_be_source(self) -> bool {
        matches!(self, Self::Source | Self::Bidirectional)
    }

    pub fn can_be_output(self) -> bool {
        matches!(self, Self::Output | Self::Bidirectional)
    }
}

/// Operations a plugin may or may not implement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Decode to a file.
    pub decode: bool,
    /// Decode to the output pipe.
    pub decode_stream: bool,
    /// Encode from a file.
    pub encode: bool,
    /// Encode from a piped stream.
    pub encode_stream: bool,
    /// Read and write tags.
    pub tags: bool,
}

impl Capabilities {
    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::Decode => self.decode,
            Operation::DecodeStream => self.decode_stream,
            Operation::Encode => self.encode,
            Operation::EncodeStream => self.encode_stream,
            Operation::ReadTags | Operation::WriteTags => self.tags,
        }
    }
}

/// A plugin operation, used to report unsupported requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Decode,
    DecodeStream,
    Encode,
    EncodeStream,
    ReadTags,
    WriteTags,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Decode => "decode",
            Self::DecodeStream => "streamed decode",
            Self::Encode => "encode",
            Self::EncodeStream => "streamed encode",
            Self::ReadTags => "reading tags",
            Self::WriteTags => "writing tags",
        };
        f.write_str(name)
    }
}

/// Audio fed into an encoder.
#[derive(Debug)]
pub enum EncodeSource {
    /// A decoded file on disk.
    Path(PathBuf),
    /// The output pipe of a running decoder.
    Stream(PipeReader),
}

impl EncodeSource {
    /// Borrowed view used to build the argument vector.
    pub fn as_input(&self) -> EncodeInput<'_> {
        match self {
            Self::Path(path) => EncodeInput::Path(path),
            Self::Stream(_) => EncodeInput::Stream,
        }
    }

    pub(crate) fn into_process_input(self) -> ProcessInput {
        match self {
            Self::Path(_) => ProcessInput::Null,
            Self::Stream(reader) => ProcessInput::Pipe(reader),
        }
    }
}

/// How an encoder invocation receives its audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeInput<'a> {
    /// Passed as a path argument.
    Path(&'a Path),
    /// Read from standard input.
    Stream,
}

impl EncodeInput<'_> {
    /// The argument naming the input: the path, or `-` for standard input.
    pub fn to_arg(&self) -> OsString {
        match self {
            Self::Path(path) => path.as_os_str().to_os_string(),
            Self::Stream => OsString::from("-"),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Path(_) => Operation::Encode,
            Self::Stream => Operation::EncodeStream,
        }
    }
}
