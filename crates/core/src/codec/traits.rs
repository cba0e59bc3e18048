//! Trait definitions for the codec module.

use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use super::context::{remove_existing, CodecContext};
use super::error::CodecError;
use super::quality::{QualityParams, QualityTable};
use super::types::{Capabilities, EncodeInput, EncodeSource, Operation, PluginRole};
use crate::process::{Invocation, OutputSink, ProcessHandle, ProcessInput};
use crate::tags::TagSet;

/// One audio format, backed by external programs.
///
/// Implementors describe their format through the argument builders
/// (`*_invocation`); the provided methods take care of removing existing
/// targets, launching through the shared runner and going through the tag
/// bridge. Builders for operations a plugin lacks keep their default, which
/// reports [`CodecError::Unsupported`].
///
/// Plugins are immutable after construction and safe to share across
/// concurrent conversions of different files.
#[async_trait]
pub trait CodecPlugin: Send + Sync {
    /// Registry name, e.g. `"flac"`.
    fn name(&self) -> &str;

    /// Canonical file suffix without the dot.
    fn extension(&self) -> &str;

    /// Whether the format is a source, an output or both.
    fn role(&self) -> PluginRole;

    /// Operations this plugin implements.
    fn capabilities(&self) -> Capabilities;

    /// Shared runner and tag bridge.
    fn context(&self) -> &CodecContext;

    /// Quality table, if the encoder takes a quality setting.
    fn quality_table(&self) -> Option<&'static QualityTable> {
        None
    }

    /// Resolves `quality` against this plugin's table.
    ///
    /// Plugins without a table accept any value and return `None`.
    fn resolve_quality(&self, quality: u8) -> Result<Option<&'static QualityParams>, CodecError> {
        self.quality_table()
            .map(|table| table.resolve(quality))
            .transpose()
    }

    /// Arguments for decoding `source` into the file `dest`.
    fn decode_invocation(&self, _source: &Path, _dest: &Path) -> Result<Invocation, CodecError> {
        Err(CodecError::unsupported(self.name(), Operation::Decode))
    }

    /// Arguments for decoding `source` to standard output.
    fn decode_stream_invocation(&self, _source: &Path) -> Result<Invocation, CodecError> {
        Err(CodecError::unsupported(self.name(), Operation::DecodeStream))
    }

    /// Arguments for encoding `input` into `dest` at `quality`.
    fn encode_invocation(
        &self,
        _dest: &Path,
        input: EncodeInput<'_>,
        _quality: u8,
    ) -> Result<Invocation, CodecError> {
        Err(CodecError::unsupported(self.name(), input.operation()))
    }

    /// Starts decoding `source` into `dest` and returns without waiting.
    ///
    /// Any existing file at `dest` is removed before the decoder is launched.
    async fn decode(
        &self,
        source: &Path,
        dest: &Path,
        niceness: i32,
        sink: OutputSink,
    ) -> Result<ProcessHandle, CodecError> {
        let invocation = self.decode_invocation(source, dest)?;
        remove_existing(dest).await?;
        info!(codec = self.name(), source = %source.display(), dest = %dest.display(), "Decoding");
        self.context()
            .spawn(&invocation, niceness, ProcessInput::Null, sink)
    }

    /// Starts decoding `source` into the handle's output pipe.
    ///
    /// The decoded audio shares the pipe with the decoder's diagnostics, so
    /// decoders must be invoked in a silent mode.
    async fn decode_stream(&self, source: &Path, niceness: i32) -> Result<ProcessHandle, CodecError> {
        let invocation = self.decode_stream_invocation(source)?;
        info!(codec = self.name(), source = %source.display(), "Decoding to stream");
        self.context()
            .spawn(&invocation, niceness, ProcessInput::Null, OutputSink::Pipe)
    }

    /// Starts encoding `source` into `dest` and returns without waiting.
    ///
    /// `quality` is validated before anything is touched; any existing file at
    /// `dest` is then removed before the encoder is launched.
    async fn encode(
        &self,
        dest: &Path,
        source: EncodeSource,
        quality: u8,
        niceness: i32,
        sink: OutputSink,
    ) -> Result<ProcessHandle, CodecError> {
        self.resolve_quality(quality)?;
        let invocation = self.encode_invocation(dest, source.as_input(), quality)?;
        remove_existing(dest).await?;
        info!(codec = self.name(), dest = %dest.display(), quality, "Encoding");
        self.context()
            .spawn(&invocation, niceness, source.into_process_input(), sink)
    }

    /// Reads the tags of `path`.
    async fn get_tags(&self, path: &Path) -> Result<TagSet, CodecError> {
        if !self.capabilities().tags {
            return Err(CodecError::unsupported(self.name(), Operation::ReadTags));
        }
        self.context().read_tags(path).await
    }

    /// Merges `tags` into the tag container of `path` and saves it.
    async fn set_tags(&self, path: &Path, tags: &TagSet) -> Result<(), CodecError> {
        if !self.capabilities().tags {
            return Err(CodecError::unsupported(self.name(), Operation::WriteTags));
        }
        self.context().write_tags(path, tags).await
    }
}
