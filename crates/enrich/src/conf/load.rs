//! Load — config loading from file and environment variables.

use std::path::Path;

use super::model::EnrichConfig;
use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/enrich/enrich.toml";

impl EnrichConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("ENRICH_CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::default()
        };

        config.apply_env();
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Environment variables override file values.
    pub fn apply_env(&mut self) {
        if let Ok(codec) = std::env::var("ENRICH_DEFAULT_CODEC") {
            self.default_codec = codec;
        }
        if let Some(strict) = std::env::var("ENRICH_STRICT_TIMESTAMPS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.strict_timestamps = strict;
        }
    }
}
