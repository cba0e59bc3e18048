use std::sync::Arc;

use super::{types::TranscoderConfig, ConfigError};
use crate::codec::{CodecPlugin, CodecRegistry};
use crate::tags::LoftyTagBridge;

/// Highest quality index any built-in table accepts.
const MAX_QUALITY: u8 = 10;

/// Range accepted by `nice -n`.
const NICENESS_RANGE: std::ops::RangeInclusive<i32> = -20..=19;

/// Validate configuration
/// Currently validates:
/// - Configured formats exist and can play their role (source or target)
/// - Streaming is only enabled for formats that can decode and encode streams
/// - Quality is within the target's table (or the global range when the
///   target is picked per file)
/// - Niceness is a valid `nice -n` level
/// - No tool path is empty
pub fn validate_config(config: &TranscoderConfig) -> Result<(), ConfigError> {
    let pipeline = &config.pipeline;

    if !NICENESS_RANGE.contains(&pipeline.niceness) {
        return Err(ConfigError::ValidationError(format!(
            "pipeline.niceness must be between -20 and 19, got {}",
            pipeline.niceness
        )));
    }

    if pipeline.temp_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "pipeline.temp_dir cannot be empty".to_string(),
        ));
    }

    let tools = &config.tools;
    for (name, path) in [
        ("nice", &tools.nice),
        ("flac", &tools.flac),
        ("lame", &tools.lame),
        ("afconvert", &tools.afconvert),
        ("wrapper", &tools.wrapper),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "tools.{name} cannot be empty"
            )));
        }
    }

    let registry = CodecRegistry::with_builtin(tools, Arc::new(LoftyTagBridge::new()));

    if let Some(name) = &pipeline.source_format {
        let plugin = lookup(&registry, "source_format", name)?;
        if !plugin.role().can_be_source() {
            return Err(ConfigError::ValidationError(format!(
                "pipeline.source_format: {name} cannot be decoded"
            )));
        }
        if pipeline.streaming && !plugin.capabilities().decode_stream {
            return Err(ConfigError::ValidationError(format!(
                "pipeline.streaming: {name} cannot decode to a stream"
            )));
        }
    }

    match &pipeline.target_format {
        Some(name) => {
            let plugin = lookup(&registry, "target_format", name)?;
            if !plugin.role().can_be_output() {
                return Err(ConfigError::ValidationError(format!(
                    "pipeline.target_format: {name} cannot be encoded"
                )));
            }
            if pipeline.streaming && !plugin.capabilities().encode_stream {
                return Err(ConfigError::ValidationError(format!(
                    "pipeline.streaming: {name} cannot encode from a stream"
                )));
            }
            plugin
                .resolve_quality(pipeline.quality)
                .map_err(|e| ConfigError::ValidationError(format!("pipeline.quality: {e}")))?;
        }
        None if pipeline.quality > MAX_QUALITY => {
            return Err(ConfigError::ValidationError(format!(
                "pipeline.quality must be between 0 and {MAX_QUALITY}, got {}",
                pipeline.quality
            )));
        }
        None => {}
    }

    Ok(())
}

fn lookup(
    registry: &CodecRegistry,
    field: &str,
    name: &str,
) -> Result<Arc<dyn CodecPlugin>, ConfigError> {
    registry.get(name).ok_or_else(|| {
        ConfigError::ValidationError(format!(
            "pipeline.{field}: unknown format '{name}' (known: {})",
            registry.names().join(", ")
        ))
    })
}
