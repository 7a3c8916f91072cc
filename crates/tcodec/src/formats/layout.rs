use std::fmt::Write;

use chrono::format::{Item, ParseErrorKind, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::codec::{TimeDecoder, TimeEncoder};
use crate::error::{CodecError, DecodeError};
use crate::iter::JsonIter;
use crate::time::Time;

/// Strings formatted with a strftime layout.
///
/// Layouts without an offset are read as UTC; date-only layouts as midnight UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    layout: String,
}

impl Layout {
    pub fn new(layout: &str) -> Result<Self, CodecError> {
        if layout.is_empty() {
            return Err(CodecError::EmptyLayout);
        }
        if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
            return Err(CodecError::InvalidLayout(layout.to_string()));
        }
        Ok(Self {
            layout: layout.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.layout
    }

    fn parse(&self, input: &str) -> Result<Time, DecodeError> {
        let err = match DateTime::parse_from_str(input, &self.layout) {
            Ok(dt) => return Ok(Time::new(dt)),
            Err(e) if e.kind() != ParseErrorKind::NotEnough => return Err(self.error(input, e)),
            Err(e) => e,
        };
        match NaiveDateTime::parse_from_str(input, &self.layout) {
            Ok(naive) => return Ok(Time::new(naive.and_utc())),
            Err(e) if e.kind() != ParseErrorKind::NotEnough => return Err(self.error(input, e)),
            Err(_) => {}
        }
        NaiveDate::parse_from_str(input, &self.layout)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Time::new(naive.and_utc()))
            .ok_or_else(|| self.error(input, err))
    }

    fn error(&self, input: &str, reason: chrono::ParseError) -> DecodeError {
        DecodeError::Layout {
            layout: self.layout.clone(),
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl TimeDecoder for Layout {
    fn decode_time(&self, iter: &mut JsonIter) -> Result<Time, DecodeError> {
        match iter.read()? {
            Value::Null => Ok(Time::ZERO),
            Value::String(s) if s.is_empty() => Ok(Time::ZERO),
            Value::String(s) => self.parse(&s),
            _ => Err(DecodeError::InvalidValue {
                codec: "layout",
                expected: "string or null",
            }),
        }
    }
}

impl TimeEncoder for Layout {
    fn encode_time(&self, tm: Time) -> Value {
        let Some(dt) = tm.datetime() else {
            return Value::Null;
        };
        let mut out = String::new();
        if write!(out, "{}", dt.format(&self.layout)).is_err() {
            tracing::warn!("Layout {:?} cannot format {}", self.layout, dt);
            return Value::Null;
        }
        Value::String(out)
    }
}
