use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::codec::TimeCodec;
use crate::time::Time;

pub fn serialize_time<S>(codec: &TimeCodec, tm: &Time, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    codec.encode(*tm).serialize(serializer)
}

pub fn deserialize_time<'de, D>(codec: &TimeCodec, deserializer: D) -> Result<Time, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decode_value(codec, &value).map_err(D::Error::custom)
}

/// `None` and the zero time both serialize as `null`.
pub fn serialize_time_option<S>(codec: &TimeCodec, tm: &Option<Time>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match tm {
        Some(tm) => serialize_time(codec, tm, serializer),
        None => serializer.serialize_none(),
    }
}

/// `null`, `""` and anything else that decodes to the zero time become `None`.
pub fn deserialize_time_option<'de, D>(codec: &TimeCodec, deserializer: D) -> Result<Option<Time>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    let tm = decode_value(codec, &value).map_err(D::Error::custom)?;
    Ok(if tm.is_zero() { None } else { Some(tm) })
}

/// Decode an already parsed JSON value.
pub fn decode_value(codec: &TimeCodec, value: &Value) -> Result<Time, crate::DecodeError> {
    let raw = serde_json::to_vec(value).map_err(|e| crate::DecodeError::Syntax {
        offset: 0,
        reason: e.to_string(),
    })?;
    codec.decode_json(&raw)
}

macro_rules! codec_module {
    ($(#[$meta:meta])* $name:ident => $codec:path) => {
        $(#[$meta])*
        pub mod $name {
            use serde::{Deserializer, Serializer};
            use crate::time::Time;

            pub fn serialize<S: Serializer>(tm: &Time, serializer: S) -> Result<S::Ok, S::Error> {
                super::serialize_time(&$codec(), tm, serializer)
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
                super::deserialize_time(&$codec(), deserializer)
            }

            /// `Option<Time>` variant.
            pub mod option {
                use serde::{Deserializer, Serializer};
                use crate::time::Time;

                pub fn serialize<S: Serializer>(tm: &Option<Time>, serializer: S) -> Result<S::Ok, S::Error> {
                    super::super::serialize_time_option(&$codec(), tm, serializer)
                }

                pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Time>, D::Error> {
                    super::super::deserialize_time_option(&$codec(), deserializer)
                }
            }
        }
    };
}

codec_module!(
    /// `#[serde(with = "tcodec::serde_utils::rfc3339")]`
    rfc3339 => crate::formats::std_codec
);
codec_module!(
    /// `#[serde(with = "tcodec::serde_utils::unix")]`
    unix => crate::formats::unix_seconds
);
codec_module!(
    /// `#[serde(with = "tcodec::serde_utils::unix_ms")]`
    unix_ms => crate::formats::unix_millis
);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Event {
        #[serde(with = "unix_ms")]
        created: Time,
        #[serde(with = "unix::option", default)]
        updated: Option<Time>,
        seen: Time,
    }

    fn new_year_2020() -> Time {
        Time::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
    }

    // ── Direct fields ────────────────────────────────────────────

    #[test]
    fn test_deserialize_per_field_codecs() {
        let event: Event = serde_json::from_str(
            r#"{"created": 1577836800000, "updated": "1577836800", "seen": "2020-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(event.created, new_year_2020());
        assert_eq!(event.updated, Some(new_year_2020()));
        assert_eq!(event.seen, new_year_2020());
    }

    #[test]
    fn test_serialize_per_field_codecs() {
        let event = Event {
            created: new_year_2020(),
            updated: None,
            seen: Time::ZERO,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"created": 1577836800000i64, "updated": null, "seen": null})
        );
    }

    #[test]
    fn test_decode_error_is_reported() {
        let err = serde_json::from_str::<Event>(r#"{"created": "soon", "seen": null}"#).unwrap_err();
        assert!(err.to_string().contains("unix_ms"), "{}", err);
    }

    // ── Optional fields ──────────────────────────────────────────

    #[test]
    fn test_option_empty_string_is_none() {
        let event: Event = serde_json::from_str(r#"{"created": null, "updated": "", "seen": ""}"#).unwrap();
        assert!(event.created.is_zero());
        assert_eq!(event.updated, None);
        assert!(event.seen.is_zero());
    }

    #[test]
    fn test_option_missing_field_is_none() {
        let event: Event = serde_json::from_str(r#"{"created": 0, "seen": null}"#).unwrap();
        assert_eq!(event.updated, None);
        assert_eq!(event.created.to_utc().unwrap().timestamp(), 0);
    }

    #[test]
    fn test_decode_value_helper() {
        let tm = decode_value(&crate::unix_seconds(), &serde_json::json!(1577836800)).unwrap();
        assert_eq!(tm, new_year_2020());
    }
}
