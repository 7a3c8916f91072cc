use std::fmt;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A timestamp with an explicit zero (absent) state.
///
/// The zero time is what decoders produce for `null` and `""`, and every
/// encoder writes it back as JSON `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Time(Option<DateTime<FixedOffset>>);

impl Time {
    /// The zero time.
    pub const ZERO: Time = Time(None);

    pub fn new<Tz: TimeZone>(dt: DateTime<Tz>) -> Self {
        Self(Some(dt.fixed_offset()))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.0
    }

    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        self.0.map(|dt| dt.with_timezone(&Utc))
    }

    /// Same instant viewed in `offset`; zero stays zero.
    pub fn in_offset(self, offset: FixedOffset) -> Self {
        Self(self.0.map(|dt| dt.with_timezone(&offset)))
    }

    pub(crate) fn from_unix_micros(micros: i64) -> Option<Self> {
        DateTime::from_timestamp_micros(micros).map(Self::new)
    }

    pub(crate) fn from_unix_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self::new)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Time {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::new(dt)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => f.write_str("<zero>"),
        }
    }
}

/// Fields typed as `Time` without an explicit codec use the standard codec.
impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::serde_utils::serialize_time(&crate::std_codec(), self, serializer)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        crate::serde_utils::deserialize_time(&crate::std_codec(), deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        assert!(Time::default().is_zero());
        assert_eq!(Time::default(), Time::ZERO);
    }

    #[test]
    fn test_in_offset_keeps_instant() {
        let utc = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let shifted = Time::new(utc).in_offset(offset);

        assert_eq!(shifted.to_utc(), Some(utc));
        assert_eq!(shifted.datetime().unwrap().offset(), &offset);
    }

    #[test]
    fn test_in_offset_zero_stays_zero() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        assert!(Time::ZERO.in_offset(offset).is_zero());
    }

    #[test]
    fn test_serde_uses_standard_codec() {
        let tm = Time::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(serde_json::to_string(&tm).unwrap(), r#""2020-01-01T00:00:00Z""#);
        assert_eq!(serde_json::to_string(&Time::ZERO).unwrap(), "null");

        let back: Time = serde_json::from_str(r#""2020-01-01T00:00:00Z""#).unwrap();
        assert_eq!(back, tm);
    }
}
