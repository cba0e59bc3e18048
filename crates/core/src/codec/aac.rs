//! AAC plugin using the platform-native `afconvert` encoder.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

use super::context::CodecContext;
use super::error::CodecError;
use super::helper::{helper_invocation, HelperMode, INPUT_PLACEHOLDER};
use super::quality::{QualityTable, AAC_QUALITY};
use super::traits::CodecPlugin;
use super::types::{Capabilities, EncodeInput, PluginRole};
use crate::process::Invocation;

/// Suffix given to the helper's temporary input file.
const STREAM_SUFFIX: &str = ".wav";

/// Output-only AAC encoder writing `.m4a` files (macOS, or a manual
/// `afconvert` build).
///
/// `afconvert` cannot read standard input, so streamed sources go through the
/// helper, which spools them to a temporary file first.
///
/// | value | bitrate |
/// |-------|---------|
/// | 0     | 64000   |
/// | 1     | 96000   |
/// | 2     | 128000  |
/// | 3     | 160000  |
/// | 4-5   | 192000  |
/// | 6     | 224000  |
/// | 7-9   | 256000  |
/// | 10    | 320000  |
#[derive(Debug, Clone)]
pub struct AacPlugin {
    context: CodecContext,
    program: OsString,
    helper: OsString,
}

impl AacPlugin {
    pub fn new(
        context: CodecContext,
        program: impl Into<OsString>,
        helper: impl Into<OsString>,
    ) -> Self {
        Self {
            context,
            program: program.into(),
            helper: helper.into(),
        }
    }

    fn afconvert(&self, input: OsString, dest: &Path, quality: u8) -> Result<Invocation, CodecError> {
        let bitrate = AAC_QUALITY.resolve(quality)?;
        Ok(Invocation::new(self.program.clone())
            .args(["-f", "m4af", "-d", "aac ", "-s", "3"])
            .args(bitrate.to_args())
            .arg(input)
            .path_arg(dest))
    }
}

#[async_trait]
impl CodecPlugin for AacPlugin {
    fn name(&self) -> &str {
        "aac"
    }

    fn extension(&self) -> &str {
        "m4a"
    }

    fn role(&self) -> PluginRole {
        PluginRole::Output
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            encode: true,
            encode_stream: true,
            tags: true,
            ..Default::default()
        }
    }

    fn context(&self) -> &CodecContext {
        &self.context
    }

    fn quality_table(&self) -> Option<&'static QualityTable> {
        Some(&AAC_QUALITY)
    }

    fn encode_invocation(
        &self,
        dest: &Path,
        input: EncodeInput<'_>,
        quality: u8,
    ) -> Result<Invocation, CodecError> {
        match input {
            EncodeInput::Path(_) => self.afconvert(input.to_arg(), dest, quality),
            EncodeInput::Stream => {
                let inner = self.afconvert(INPUT_PLACEHOLDER.into(), dest, quality)?;
                Ok(helper_invocation(
                    self.helper.clone(),
                    HelperMode::Encode,
                    STREAM_SUFFIX,
                    inner,
                ))
            }
        }
    }
}
