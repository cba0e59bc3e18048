//! Configuration for the codec plugins.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Locations of the external programs the plugins drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    /// Priority-lowering prefix.
    #[serde(default = "default_nice")]
    pub nice: PathBuf,

    /// FLAC reference encoder/decoder.
    #[serde(default = "default_flac")]
    pub flac: PathBuf,

    /// LAME MP3 encoder.
    #[serde(default = "default_lame")]
    pub lame: PathBuf,

    /// macOS `afconvert`.
    #[serde(default = "default_afconvert")]
    pub afconvert: PathBuf,

    /// Stream-to-tempfile helper used by encoders that cannot read stdin.
    #[serde(default = "default_wrapper")]
    pub wrapper: PathBuf,
}

fn default_nice() -> PathBuf {
    PathBuf::from("nice")
}

fn default_flac() -> PathBuf {
    PathBuf::from("flac")
}

fn default_lame() -> PathBuf {
    PathBuf::from("lame")
}

fn default_afconvert() -> PathBuf {
    PathBuf::from("afconvert")
}

fn default_wrapper() -> PathBuf {
    PathBuf::from("transcode-wrapper")
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            nice: default_nice(),
            flac: default_flac(),
            lame: default_lame(),
            afconvert: default_afconvert(),
            wrapper: default_wrapper(),
        }
    }
}

impl ToolPaths {
    /// Points every encoder and decoder at the same program.
    ///
    /// Handy for tests that substitute `true`, `false` or `cat` for the real tools.
    pub fn all(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        Self {
            flac: program.clone(),
            lame: program.clone(),
            afconvert: program.clone(),
            wrapper: program,
            ..Default::default()
        }
    }

    /// Sets the `nice` executable.
    pub fn with_nice(mut self, nice: impl Into<PathBuf>) -> Self {
        self.nice = nice.into();
        self
    }

    /// Sets the `flac` executable.
    pub fn with_flac(mut self, flac: impl Into<PathBuf>) -> Self {
        self.flac = flac.into();
        self
    }

    /// Sets the `lame` executable.
    pub fn with_lame(mut self, lame: impl Into<PathBuf>) -> Self {
        self.lame = lame.into();
        self
    }

    /// Sets the `afconvert` executable.
    pub fn with_afconvert(mut self, afconvert: impl Into<PathBuf>) -> Self {
        self.afconvert = afconvert.into();
        self
    }

    /// Sets the stream helper executable.
    pub fn with_wrapper(mut self, wrapper: impl Into<PathBuf>) -> Self {
        self.wrapper = wrapper.into();
        self
    }
}
