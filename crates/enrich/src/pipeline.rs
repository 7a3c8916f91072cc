//! Pipeline — routes records to their schema and enriches them.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tcodec::{CodecRegistry, Time};
use tracing::debug;

use crate::conf::EnrichConfig;
use crate::error::{ConfigError, EnrichError, EnrichResult};
use crate::registry::SharedRegistry;
use crate::row::LogRow;
use crate::schema::Schema;

/// Frozen enrichment state shared by all workers.
#[derive(Debug, Clone)]
pub struct Enricher {
    registry: SharedRegistry,
    schemas: HashMap<String, Schema>,
}

impl Enricher {
    /// Compile every schema of `config` against the frozen registries.
    pub fn new(registry: SharedRegistry, codecs: &CodecRegistry, config: &EnrichConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;
        let mut schemas = HashMap::with_capacity(config.schemas.len());
        for cfg in &config.schemas {
            let schema = Schema::from_config(cfg, config.strict_timestamps, &registry, codecs)?;
            schemas.insert(cfg.log_type.clone(), schema);
        }
        debug!("Enricher ready with {} schema(s)", schemas.len());
        Ok(Self { registry, schemas })
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn schema(&self, log_type: &str) -> Option<&Schema> {
        self.schemas.get(log_type)
    }

    pub fn log_types(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn enrich(&self, log_type: &str, record: Value, parse_time: Time) -> EnrichResult<LogRow<Map<String, Value>>> {
        let schema = self
            .schemas
            .get(log_type)
            .ok_or_else(|| EnrichError::UnknownLogType(log_type.to_string()))?;
        schema.enrich(&self.registry, record, parse_time)
    }
}
