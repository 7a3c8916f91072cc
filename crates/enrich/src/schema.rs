//! Schema — binds raw record paths to scanners and timestamp codecs for one log type.

use serde_json::{Map, Value};
use tcodec::{join, parse_offset, try_decoders, CodecError, CodecRegistry, Time, TimeCodec};
use tracing::{debug, warn};

use crate::conf::{SchemaConfig, TimeFieldConfig};
use crate::error::{ConfigError, EnrichError, EnrichResult};
use crate::indicators::Indicators;
use crate::registry::Registry;
use crate::row::LogRow;

#[derive(Debug, Clone)]
struct ScanField {
    path: String,
    scanner: String,
}

#[derive(Debug, Clone)]
struct TimeField {
    path: String,
    /// Decoder chain plus the encoder of the field's own codec
    codec: TimeCodec,
    event_time: bool,
}

/// A compiled schema: every name is resolved, every codec composed.
#[derive(Debug, Clone)]
pub struct Schema {
    log_type: String,
    scan: Vec<ScanField>,
    timestamps: Vec<TimeField>,
    strict: bool,
}

impl Schema {
    pub fn from_config(
        cfg: &SchemaConfig,
        strict: bool,
        registry: &Registry,
        codecs: &CodecRegistry,
    ) -> Result<Self, ConfigError> {
        let mut scan = Vec::with_capacity(cfg.scan.len());
        for field in &cfg.scan {
            if !registry.has_scanner(&field.scanner) {
                return Err(ConfigError::UnknownScanner {
                    log_type: cfg.log_type.clone(),
                    path: field.path.clone(),
                    scanner: field.scanner.clone(),
                });
            }
            scan.push(ScanField {
                path: field.path.clone(),
                scanner: field.scanner.clone(),
            });
        }

        let mut timestamps = Vec::with_capacity(cfg.timestamps.len());
        for field in &cfg.timestamps {
            let codec = compile_time_field(field, codecs).map_err(|source| ConfigError::Codec {
                log_type: cfg.log_type.clone(),
                path: field.path.clone(),
                source,
            })?;
            timestamps.push(TimeField {
                path: field.path.clone(),
                codec,
                event_time: field.event_time,
            });
        }

        debug!(
            "Compiled schema {} ({} scan field(s), {} timestamp field(s))",
            cfg.log_type,
            scan.len(),
            timestamps.len()
        );
        Ok(Self {
            log_type: cfg.log_type.clone(),
            scan,
            timestamps,
            strict,
        })
    }

    pub fn log_type(&self) -> &str {
        &self.log_type
    }

    /// Normalize timestamps, scan indicator fields and wrap `record` in a row.
    pub fn enrich(&self, registry: &Registry, record: Value, parse_time: Time) -> EnrichResult<LogRow<Map<String, Value>>> {
        let Value::Object(mut event) = record else {
            return Err(EnrichError::NotAnObject);
        };

        let mut event_time = Time::ZERO;
        for field in &self.timestamps {
            let Some(value) = lookup_mut(&mut event, &field.path) else {
                continue;
            };
            match tcodec::serde_utils::decode_value(&field.codec, value) {
                Ok(tm) => {
                    *value = field.codec.encode(tm);
                    if field.event_time {
                        event_time = tm;
                    }
                }
                Err(source) if self.strict => {
                    return Err(EnrichError::Timestamp {
                        path: field.path.clone(),
                        source,
                    });
                }
                Err(e) => {
                    warn!(log_type = %self.log_type, path = %field.path, error = %e, "Timestamp not decoded, leaving as-is");
                }
            }
        }

        let mut indicators = Indicators::new();
        for field in &self.scan {
            let Some(value) = lookup(&event, &field.path) else {
                continue;
            };
            for input in scan_inputs(value) {
                registry.scan_into(&mut indicators, &field.scanner, &input)?;
            }
        }

        let mut row = LogRow::new(self.log_type.clone(), event, parse_time);
        row.event_time = event_time;
        row.indicators = indicators;
        Ok(row)
    }
}

fn compile_time_field(field: &TimeFieldConfig, codecs: &CodecRegistry) -> Result<TimeCodec, CodecError> {
    let primary = codecs.resolve(field.codec.as_deref())?;
    let fallback = field
        .fallback
        .iter()
        .map(|selector| codecs.lookup(selector))
        .collect::<Result<Vec<_>, _>>()?;

    // Fallbacks only widen what is accepted; output always uses the primary codec.
    let codec = if fallback.is_empty() {
        primary
    } else {
        join(try_decoders(&primary, fallback), &primary)
    };
    match &field.timezone {
        Some(tz) => Ok(codec.in_offset(parse_offset(tz)?)),
        None => Ok(codec),
    }
}

fn lookup<'a>(event: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut value = event.get(segments.next()?)?;
    for segment in segments {
        value = value.get(segment)?;
    }
    Some(value)
}

fn lookup_mut<'a>(event: &'a mut Map<String, Value>, path: &str) -> Option<&'a mut Value> {
    let mut segments = path.split('.');
    let mut value = event.get_mut(segments.next()?)?;
    for segment in segments {
        value = value.get_mut(segment)?;
    }
    Some(value)
}

/// Strings and numbers are scanned, arrays one element at a time; anything else is skipped.
fn scan_inputs(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Number(n) => vec![n.to_string()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}
