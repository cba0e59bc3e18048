//! FLAC plugin, driving the reference `flac` tool in both directions.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

use super::context::CodecContext;
use super::error::CodecError;
use super::traits::CodecPlugin;
use super::types::{Capabilities, EncodeInput, PluginRole};
use crate::process::Invocation;

/// Lossless source format that can also be re-encoded to.
///
/// Requires `flac` (<https://xiph.org/flac/>). Quality is ignored.
#[derive(Debug, Clone)]
pub struct FlacPlugin {
    context: CodecContext,
    program: OsString,
}

impl FlacPlugin {
    pub fn new(context: CodecContext, program: impl Into<OsString>) -> Self {
        Self {
            context,
            program: program.into(),
        }
    }

    fn base(&self) -> Invocation {
        Invocation::new(self.program.clone()).arg("--totally-silent")
    }
}

#[async_trait]
impl CodecPlugin for FlacPlugin {
    fn name(&self) -> &str {
        "flac"
    }

    fn extension(&self) -> &str {
        "flac"
    }

    fn role(&self) -> PluginRole {
        PluginRole::Bidirectional
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            decode: true,
            decode_stream: true,
            encode: true,
            encode_stream: true,
            tags: true,
        }
    }

    fn context(&self) -> &CodecContext {
        &self.context
    }

    fn decode_invocation(&self, source: &Path, dest: &Path) -> Result<Invocation, CodecError> {
        Ok(self.base().args(["-d", "-o"]).path_arg(dest).path_arg(source))
    }

    fn decode_stream_invocation(&self, source: &Path) -> Result<Invocation, CodecError> {
        Ok(self.base().args(["-d", "-c"]).path_arg(source))
    }

    fn encode_invocation(
        &self,
        dest: &Path,
        input: EncodeInput<'_>,
        _quality: u8,
    ) -> Result<Invocation, CodecError> {
        Ok(self.base().arg("-o").path_arg(dest).arg(input.to_arg()))
    }
}
