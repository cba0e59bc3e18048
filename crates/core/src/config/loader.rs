use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::TranscoderConfig, ConfigError};

/// Prefix of environment variable overrides, e.g.
/// `TRANSCODER_PIPELINE__QUALITY=7` or `TRANSCODER_TOOLS__LAME=/opt/bin/lame`.
pub const ENV_PREFIX: &str = "TRANSCODER_";

/// Load configuration from file with environment variable overrides
///
/// Nested keys are separated by a double underscore so field names that
/// contain one (`target_format`) survive.
pub fn load_config(path: &Path) -> Result<TranscoderConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: TranscoderConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<TranscoderConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
