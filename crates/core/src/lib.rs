pub mod codec;
pub mod config;
pub mod pipeline;
pub mod process;
pub mod tags;
pub mod testing;

pub use codec::{
    AacPlugin, CodecError, CodecPlugin, CodecRegistry, EncodeSource, FlacPlugin, Mp3CbrPlugin,
    ToolPaths,
};
pub use config::{load_config, load_config_from_str, validate_config, ConfigError, TranscoderConfig};
pub use pipeline::{FileJob, Pipeline, PipelineConfig, PipelineError, PipelineMode, PipelineReport};
pub use process::{Invocation, OutputSink, ProcessError, ProcessHandle, ProcessInput, ProcessRunner};
pub use tags::{LoftyTagBridge, TagBridge, TagError, TagSet};
