use serde::{Deserialize, Serialize};

use crate::codec::ToolPaths;
use crate::pipeline::PipelineConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranscoderConfig {
    /// Formats, quality and process settings for every conversion.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// External program locations.
    #[serde(default)]
    pub tools: ToolPaths,
}
