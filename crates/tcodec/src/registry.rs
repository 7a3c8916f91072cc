use std::collections::HashMap;

use chrono::FixedOffset;
use tracing::debug;

use crate::codec::TimeCodec;
use crate::error::CodecError;
use crate::formats::{layout, std_codec, unix_millis, unix_seconds};
use crate::{SELECTOR_RFC3339, SELECTOR_STRFTIME_PREFIX, SELECTOR_UNIX_MILLIS, SELECTOR_UNIX_SECONDS};

/// Codecs addressable by name from schema declarations.
///
/// Built-in selectors are `unix`, `unix_ms`, `rfc3339` and `strftime=<layout>`.
/// Custom names are registered once at startup.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    named: HashMap<String, TimeCodec>,
    default: TimeCodec,
}

impl CodecRegistry {
    pub fn new() -> Self {
        let mut named = HashMap::new();
        named.insert(SELECTOR_UNIX_SECONDS.to_string(), unix_seconds());
        named.insert(SELECTOR_UNIX_MILLIS.to_string(), unix_millis());
        named.insert(SELECTOR_RFC3339.to_string(), std_codec());
        Self {
            named,
            default: std_codec(),
        }
    }

    pub fn register(&mut self, name: &str, codec: TimeCodec) -> Result<(), CodecError> {
        if name.is_empty() || name.contains('=') {
            return Err(CodecError::InvalidName(name.to_string()));
        }
        if self.named.contains_key(name) {
            return Err(CodecError::Duplicate(name.to_string()));
        }
        debug!("Registered time codec: {}", name);
        self.named.insert(name.to_string(), codec);
        Ok(())
    }

    /// Codec used for fields that do not name one.
    pub fn set_default(&mut self, selector: &str) -> Result<(), CodecError> {
        self.default = self.lookup(selector)?;
        Ok(())
    }

    pub fn default_codec(&self) -> &TimeCodec {
        &self.default
    }

    pub fn lookup(&self, selector: &str) -> Result<TimeCodec, CodecError> {
        if let Some(fmt) = selector.strip_prefix(SELECTOR_STRFTIME_PREFIX) {
            return layout(fmt);
        }
        self.named
            .get(selector)
            .cloned()
            .ok_or_else(|| CodecError::Unknown(selector.to_string()))
    }

    /// Resolve an optional selector, falling back to the default codec.
    pub fn resolve(&self, selector: Option<&str>) -> Result<TimeCodec, CodecError> {
        match selector {
            Some(s) if !s.is_empty() => self.lookup(s),
            _ => Ok(self.default.clone()),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a timezone override: `UTC`, `Z`, or an offset such as `+02:00`.
pub fn parse_offset(input: &str) -> Result<FixedOffset, CodecError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
        return FixedOffset::east_opt(0).ok_or_else(|| CodecError::InvalidTimezone(input.to_string()));
    }
    trimmed
        .parse::<FixedOffset>()
        .map_err(|_| CodecError::InvalidTimezone(input.to_string()))
}
