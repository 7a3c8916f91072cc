use chrono::{DateTime, SecondsFormat};
use serde_json::Value;

use crate::codec::{TimeDecoder, TimeEncoder};
use crate::error::DecodeError;
use crate::iter::JsonIter;
use crate::time::Time;

/// The default codec for timestamp fields.
///
/// Decodes strict RFC 3339 and encodes RFC 3339 with as many fractional
/// digits as the value needs (0, 3, 6 or 9), `Z` for UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc3339;

impl TimeDecoder for Rfc3339 {
    fn decode_time(&self, iter: &mut JsonIter) -> Result<Time, DecodeError> {
        match iter.read()? {
            Value::Null => Ok(Time::ZERO),
            Value::String(s) if s.is_empty() => Ok(Time::ZERO),
            Value::String(s) => DateTime::parse_from_rfc3339(&s)
                .map(Time::new)
                .map_err(|e| DecodeError::Rfc3339 {
                    input: s.clone(),
                    reason: e.to_string(),
                }),
            _ => Err(DecodeError::InvalidValue {
                codec: "rfc3339",
                expected: "string or null",
            }),
        }
    }
}

impl TimeEncoder for Rfc3339 {
    fn encode_time(&self, tm: Time) -> Value {
        match tm.datetime() {
            Some(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => Value::Null,
        }
    }
}
