//! Model — EnrichConfig and per-log-type schema declarations.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    /// Codec selector for timestamp fields that do not name one
    pub default_codec: String,
    /// Fail the whole record when a timestamp field does not decode
    pub strict_timestamps: bool,
    /// Extra named codecs: name → strftime layout
    pub codecs: HashMap<String, String>,
    pub schemas: Vec<SchemaConfig>,
}

/// Field bindings for one log type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub log_type: String,
    pub scan: Vec<ScanFieldConfig>,
    pub timestamps: Vec<TimeFieldConfig>,
}

/// A raw field whose value goes through a named scanner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanFieldConfig {
    /// Dotted path into the record, e.g. `userIdentity.accountId`
    pub path: String,
    pub scanner: String,
}

/// A raw field holding a timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeFieldConfig {
    pub path: String,
    /// Codec selector; the default codec when absent
    pub codec: Option<String>,
    /// Selectors tried in order when `codec` fails
    pub fallback: Vec<String>,
    /// Fixed offset forced on decoded values, e.g. `+02:00` or `UTC`
    pub timezone: Option<String>,
    /// Source of `p_event_time`
    pub event_time: bool,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            default_codec: tcodec::SELECTOR_RFC3339.to_string(),
            strict_timestamps: false,
            codecs: HashMap::new(),
            schemas: Vec::new(),
        }
    }
}

impl EnrichConfig {
    /// Validate structure; scanner and codec names are checked when schemas are built.
    pub fn validate(&self) -> Result<(), String> {
        if self.default_codec.is_empty() {
            return Err("default_codec must not be empty".to_string());
        }
        let mut seen = HashSet::new();
        for schema in &self.schemas {
            schema.validate()?;
            if !seen.insert(schema.log_type.as_str()) {
                return Err(format!("duplicate schema for log type {}", schema.log_type));
            }
        }
        Ok(())
    }
}

impl SchemaConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.log_type.is_empty() {
            return Err("schema log_type must not be empty".to_string());
        }
        for field in &self.scan {
            if field.path.is_empty() {
                return Err(format!("{}: scan path must not be empty", self.log_type));
            }
        }
        for field in &self.timestamps {
            if field.path.is_empty() {
                return Err(format!("{}: timestamp path must not be empty", self.log_type));
            }
        }
        if self.timestamps.iter().filter(|t| t.event_time).count() > 1 {
            return Err(format!("{}: more than one event_time field", self.log_type));
        }
        Ok(())
    }
}
