//! MP3 plugin using LAME constant bitrate presets.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

use super::context::CodecContext;
use super::error::CodecError;
use super::quality::{QualityTable, MP3_CBR_QUALITY};
use super::traits::CodecPlugin;
use super::types::{Capabilities, EncodeInput, PluginRole};
use crate::process::Invocation;

/// Output-only MP3 encoder.
///
/// Quality levels map onto LAME presets:
///
/// | value | preset    |
/// |-------|-----------|
/// | 0-1   | cbr 64    |
/// | 2-3   | cbr 128   |
/// | 4     | cbr 160   |
/// | 5     | cbr 192   |
/// | 6     | cbr 256   |
/// | 7-10  | insane    |
#[derive(Debug, Clone)]
pub struct Mp3CbrPlugin {
    context: CodecContext,
    program: OsString,
}

impl Mp3CbrPlugin {
    pub fn new(context: CodecContext, program: impl Into<OsString>) -> Self {
        Self {
            context,
            program: program.into(),
        }
    }
}

#[async_trait]
impl CodecPlugin for Mp3CbrPlugin {
    fn name(&self) -> &str {
        "mp3"
    }

    fn extension(&self) -> &str {
        "mp3"
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
        Some(&MP3_CBR_QUALITY)
    }

    fn encode_invocation(
        &self,
        dest: &Path,
        input: EncodeInput<'_>,
        quality: u8,
    ) -> Result<Invocation, CodecError> {
        let preset = MP3_CBR_QUALITY.resolve(quality)?;
        Ok(Invocation::new(self.program.clone())
            .args(preset.to_args())
            .arg(input.to_arg())
            .path_arg(dest))
    }
}
