//! Per-file decode → encode → tag copy orchestration.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::PipelineError;
use super::types::{FileJob, PipelineConfig, PipelineMode, PipelineReport};
use crate::codec::{CodecError, CodecPlugin, CodecRegistry, EncodeSource, Operation};
use crate::config::TranscoderConfig;
use crate::process::OutputSink;
use crate::tags::LoftyTagBridge;

/// Extension of decoded intermediate files.
const INTERMEDIATE_EXTENSION: &str = "wav";

/// Converts single files between registered codecs.
///
/// Each call to [`run`](Self::run) is sequential: decode, encode, then tag
/// copy once the encoder has exited successfully. Distinct jobs may run
/// concurrently on one `Pipeline` as long as their destinations differ.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    registry: Arc<CodecRegistry>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, registry: Arc<CodecRegistry>) -> Self {
        Self { config, registry }
    }

    /// Builds the built-in registry from the configured tool paths.
    pub fn from_config(config: &TranscoderConfig) -> Self {
        let registry = CodecRegistry::with_builtin(&config.tools, Arc::new(LoftyTagBridge::new()));
        Self::new(config.pipeline.clone(), Arc::new(registry))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<CodecRegistry> {
        &self.registry
    }

    /// Converts one file.
    ///
    /// Codec lookup, capability and quality checks all happen before the
    /// first program is launched. A partially written destination is left in
    /// place when a stage fails.
    pub async fn run(&self, job: FileJob) -> Result<PipelineReport, PipelineError> {
        let start = Instant::now();
        let mode = self.config.mode();

        let source = self.source_plugin(&job.source)?;
        let target = self.target_plugin(&job.dest)?;
        check_distinct(&job.source, &job.dest).await?;
        self.preflight(source.as_ref(), target.as_ref(), mode)?;

        info!(
            job_id = %job.job_id,
            source = %job.source.display(),
            dest = %job.dest.display(),
            from = source.name(),
            to = target.name(),
            %mode,
            "Starting conversion"
        );

        match mode {
            PipelineMode::File => self.run_file(&job, source.as_ref(), target.as_ref()).await?,
            PipelineMode::Streamed => {
                self.run_streamed(&job, source.as_ref(), target.as_ref())
                    .await?
            }
        }

        let tags_copied = copy_tags(&job, source.as_ref(), target.as_ref())
            .await
            .map_err(|source| {
                warn!(job_id = %job.job_id, error = %source, "Tag copy failed");
                PipelineError::TagCopy { source }
            })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(job_id = %job.job_id, duration_ms, tags_copied, "Conversion completed");

        Ok(PipelineReport {
            job_id: job.job_id,
            source_format: source.name().to_string(),
            target_format: target.name().to_string(),
            dest: job.dest,
            mode,
            duration_ms,
            tags_copied,
        })
    }

    fn source_plugin(&self, path: &Path) -> Result<Arc<dyn CodecPlugin>, PipelineError> {
        let plugin = self.lookup(self.config.source_format.as_deref(), path)?;
        if !plugin.role().can_be_source() {
            return Err(PipelineError::decode(CodecError::unsupported(
                plugin.name(),
                Operation::Decode,
            )));
        }
        Ok(plugin)
    }

    fn target_plugin(&self, path: &Path) -> Result<Arc<dyn CodecPlugin>, PipelineError> {
        let plugin = self.lookup(self.config.target_format.as_deref(), path)?;
        if !plugin.role().can_be_output() {
            return Err(PipelineError::encode(CodecError::unsupported(
                plugin.name(),
                Operation::Encode,
            )));
        }
        Ok(plugin)
    }

    /// Configured codec name first, file extension otherwise.
    fn lookup(
        &self,
        name: Option<&str>,
        path: &Path,
    ) -> Result<Arc<dyn CodecPlugin>, PipelineError> {
        match name {
            Some(name) => self
                .registry
                .get(name)
                .ok_or_else(|| PipelineError::unknown_format(name)),
            None => self.registry.for_path(path).ok_or_else(|| {
                let ext = path
                    .extension()
                    .map(|e| e.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                PipelineError::unknown_format(ext)
            }),
        }
    }

    fn preflight(
        &self,
        source: &dyn CodecPlugin,
        target: &dyn CodecPlugin,
        mode: PipelineMode,
    ) -> Result<(), PipelineError> {
        let (decode, encode) = match mode {
            PipelineMode::File => (Operation::Decode, Operation::Encode),
            PipelineMode::Streamed => (Operation::DecodeStream, Operation::EncodeStream),
        };

        if !source.capabilities().supports(decode) {
            return Err(PipelineError::decode(CodecError::unsupported(
                source.name(),
                decode,
            )));
        }
        if !target.capabilities().supports(encode) {
            return Err(PipelineError::encode(CodecError::unsupported(
                target.name(),
                encode,
            )));
        }

        target
            .resolve_quality(self.config.quality)
            .map_err(PipelineError::encode)?;
        Ok(())
    }

    async fn run_file(
        &self,
        job: &FileJob,
        source: &dyn CodecPlugin,
        target: &dyn CodecPlugin,
    ) -> Result<(), PipelineError> {
        tokio::fs::create_dir_all(&self.config.temp_dir).await?;
        let intermediate = self
            .config
            .temp_dir
            .join(format!("{}.{}", Uuid::new_v4(), INTERMEDIATE_EXTENSION));

        let result = self.decode_then_encode(job, source, target, &intermediate).await;

        if self.config.keep_intermediate {
            debug!(path = %intermediate.display(), "Keeping intermediate file");
        } else {
            remove_intermediate(&intermediate).await;
        }

        result
    }

    async fn decode_then_encode(
        &self,
        job: &FileJob,
        source: &dyn CodecPlugin,
        target: &dyn CodecPlugin,
        intermediate: &Path,
    ) -> Result<(), PipelineError> {
        let niceness = self.config.niceness;

        source
            .decode(&job.source, intermediate, niceness, OutputSink::Inherit)
            .await
            .map_err(PipelineError::decode)?
            .finish()
            .await
            .map_err(|e| PipelineError::decode(e.into()))?;

        debug!(job_id = %job.job_id, path = %intermediate.display(), "Decoded intermediate");

        target
            .encode(
                &job.dest,
                EncodeSource::Path(intermediate.to_path_buf()),
                self.config.quality,
                niceness,
                OutputSink::Inherit,
            )
            .await
            .map_err(PipelineError::encode)?
            .finish()
            .await
            .map_err(|e| PipelineError::encode(e.into()))
    }

    async fn run_streamed(
        &self,
        job: &FileJob,
        source: &dyn CodecPlugin,
        target: &dyn CodecPlugin,
    ) -> Result<(), PipelineError> {
        let niceness = self.config.niceness;

        let mut decoder = source
            .decode_stream(&job.source, niceness)
            .await
            .map_err(PipelineError::decode)?;

        let Some(stream) = decoder.take_output() else {
            if let Err(e) = decoder.kill().await {
                warn!(error = %e, "Failed to kill decoder");
            }
            return Err(PipelineError::Io(std::io::Error::other(
                "decoder was launched without an output pipe",
            )));
        };

        // Dropping the stream on failure closes the pipe, so the decoder
        // exits on its own and only needs reaping.
        let encoder = match target
            .encode(
                &job.dest,
                EncodeSource::Stream(stream),
                self.config.quality,
                niceness,
                OutputSink::Inherit,
            )
            .await
        {
            Ok(handle) => handle,
            Err(e) => {
                if let Err(reap) = decoder.finish().await {
                    debug!(error = %reap, "Decoder stopped after encoder failure");
                }
                return Err(PipelineError::encode(e));
            }
        };

        let (decoded, encoded) = tokio::join!(decoder.finish(), encoder.finish());
        match (decoded, encoded) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(d), Ok(())) => Err(PipelineError::decode(d.into())),
            (Ok(()), Err(e)) => Err(PipelineError::encode(e.into())),
            // A dying encoder breaks the pipe under the decoder.
            (Err(d), Err(e)) => {
                debug!(error = %d, "Decoder failed alongside encoder");
                Err(PipelineError::encode(e.into()))
            }
        }
    }
}

/// Rejects jobs whose destination would overwrite the source.
async fn check_distinct(source: &Path, dest: &Path) -> Result<(), PipelineError> {
    let same = source == dest
        || match (
            tokio::fs::canonicalize(source).await,
            tokio::fs::canonicalize(dest).await,
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };

    if same {
        return Err(PipelineError::SameFile {
            path: dest.to_path_buf(),
        });
    }
    Ok(())
}

/// Copies tags from the source file to the converted destination.
///
/// Skipped (zero tags) when either codec has no tag support.
async fn copy_tags(
    job: &FileJob,
    source: &dyn CodecPlugin,
    target: &dyn CodecPlugin,
) -> Result<usize, CodecError> {
    if !source.capabilities().tags || !target.capabilities().tags {
        debug!(job_id = %job.job_id, "Tag copy not supported, skipping");
        return Ok(0);
    }

    let tags = source.get_tags(&job.source).await?;
    if tags.is_empty() {
        debug!(job_id = %job.job_id, "Source has no tags");
        return Ok(0);
    }

    target.set_tags(&job.dest, &tags).await?;
    Ok(tags.len())
}

async fn remove_intermediate(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "Removed intermediate file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove intermediate file"),
    }
}
