use serde_json::{Number, Value};

use crate::codec::{TimeDecoder, TimeEncoder};
use crate::error::DecodeError;
use crate::iter::JsonIter;
use crate::time::Time;

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Epoch seconds as a JSON float or numeric string.
///
/// Goes through whole microseconds so float64 rounding never shows up as
/// spurious nanoseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixSeconds;

impl UnixSeconds {
    const NAME: &'static str = "unix";

    fn from_seconds(sec: f64) -> Result<Time, DecodeError> {
        let micros = sec * MICROS_PER_SECOND;
        if !micros.is_finite() || micros < i64::MIN as f64 || micros > i64::MAX as f64 {
            return Err(DecodeError::OutOfRange {
                codec: Self::NAME,
                input: sec.to_string(),
            });
        }
        Time::from_unix_micros(micros.round() as i64).ok_or_else(|| DecodeError::OutOfRange {
            codec: Self::NAME,
            input: sec.to_string(),
        })
    }
}

impl TimeDecoder for UnixSeconds {
    fn decode_time(&self, iter: &mut JsonIter) -> Result<Time, DecodeError> {
        match iter.read()? {
            Value::Null => Ok(Time::ZERO),
            Value::Number(n) => {
                let sec = n.as_f64().ok_or_else(|| invalid_number(Self::NAME, n.to_string(), "not a float"))?;
                Self::from_seconds(sec)
            }
            Value::String(s) if s.is_empty() => Ok(Time::ZERO),
            Value::String(s) => {
                let sec: f64 = s
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseFloatError| invalid_number(Self::NAME, s.clone(), e))?;
                Self::from_seconds(sec)
            }
            _ => Err(DecodeError::InvalidValue {
                codec: Self::NAME,
                expected: "number, numeric string or null",
            }),
        }
    }
}

impl TimeEncoder for UnixSeconds {
    fn encode_time(&self, tm: Time) -> Value {
        let Some(dt) = tm.datetime() else {
            return Value::Null;
        };
        let seconds = dt.timestamp_micros() as f64 / MICROS_PER_SECOND;
        Number::from_f64(seconds).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Epoch milliseconds as a JSON integer or numeric string.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixMilliseconds;

impl UnixMilliseconds {
    const NAME: &'static str = "unix_ms";

    fn from_millis(msec: i64) -> Result<Time, DecodeError> {
        Time::from_unix_millis(msec).ok_or_else(|| DecodeError::OutOfRange {
            codec: Self::NAME,
            input: msec.to_string(),
        })
    }
}

impl TimeDecoder for UnixMilliseconds {
    fn decode_time(&self, iter: &mut JsonIter) -> Result<Time, DecodeError> {
        match iter.read()? {
            Value::Null => Ok(Time::ZERO),
            Value::Number(n) => {
                let msec = n.as_i64().ok_or_else(|| invalid_number(Self::NAME, n.to_string(), "not an integer"))?;
                Self::from_millis(msec)
            }
            Value::String(s) if s.is_empty() => Ok(Time::ZERO),
            Value::String(s) => {
                let msec: i64 = s
                    .trim()
                    .parse()
                    .map_err(|e: std::num::ParseIntError| invalid_number(Self::NAME, s.clone(), e))?;
                Self::from_millis(msec)
            }
            _ => Err(DecodeError::InvalidValue {
                codec: Self::NAME,
                expected: "integer, numeric string or null",
            }),
        }
    }
}

impl TimeEncoder for UnixMilliseconds {
    fn encode_time(&self, tm: Time) -> Value {
        match tm.datetime() {
            Some(dt) => Value::from(dt.timestamp_millis()),
            None => Value::Null,
        }
    }
}

fn invalid_number(codec: &'static str, input: String, reason: impl ToString) -> DecodeError {
    DecodeError::InvalidNumber {
        codec,
        input,
        reason: reason.to_string(),
    }
}
