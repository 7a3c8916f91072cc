use std::sync::Arc;

use tracing::trace;

use crate::codec::{Decoder, TimeDecoder};
use crate::error::DecodeError;
use crate::iter::JsonIter;
use crate::pool::{shared_pool, IterPool};
use crate::time::Time;

/// Tries a list of decoders in order against the same raw value.
#[derive(Debug, Clone)]
pub struct TryDecoder {
    decoders: Vec<Decoder>,
    pool: Arc<IterPool>,
}

impl TryDecoder {
    pub fn decoders(&self) -> &[Decoder] {
        &self.decoders
    }
}

impl TimeDecoder for TryDecoder {
    fn decode_time(&self, iter: &mut JsonIter) -> Result<Time, DecodeError> {
        // Consume the value from the caller's reader first; every attempt
        // below works on its own copy of these bytes.
        let raw = iter.skip_and_return_bytes()?;
        let mut child = self.pool.borrow_iter(raw);

        let mut last_err = DecodeError::NoDecoders;
        for (attempt, decoder) in self.decoders.iter().enumerate() {
            if attempt != 0 {
                child.reset_bytes(raw);
            }
            match decoder.decode(&mut child) {
                Ok(tm) => return Ok(tm),
                Err(e) => {
                    trace!(attempt, error = %e, "time decoder failed");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}

/// Decode with `primary`, then each of `fallback` in order, using the shared pool.
pub fn try_decoders<I>(primary: impl Into<Decoder>, fallback: I) -> Decoder
where
    I: IntoIterator,
    I::Item: Into<Decoder>,
{
    try_decoders_in(shared_pool(), primary, fallback)
}

/// Same as [`try_decoders`], with scratch readers taken from `pool`.
pub fn try_decoders_in<I>(pool: Arc<IterPool>, primary: impl Into<Decoder>, fallback: I) -> Decoder
where
    I: IntoIterator,
    I::Item: Into<Decoder>,
{
    let mut decoders = vec![primary.into()];
    decoders.extend(fallback.into_iter().map(Into::into));
    Decoder::new(TryDecoder { decoders, pool })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{join, layout, std_codec, unix_millis, unix_seconds};
    use chrono::{TimeZone, Utc};

    fn new_year_2020() -> Time {
        Time::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap())
    }

    fn decode(dec: &Decoder, raw: &[u8]) -> Result<Time, DecodeError> {
        dec.decode(&mut JsonIter::new(raw))
    }

    #[test]
    fn test_second_decoder_wins() {
        let dec = try_decoders(layout("bad").unwrap(), [unix_seconds()]);
        assert_eq!(decode(&dec, br#""1577836800""#).unwrap(), new_year_2020());
    }

    #[test]
    fn test_first_success_short_circuits() {
        let dec = try_decoders(std_codec(), [unix_seconds()]);
        let tm = decode(&dec, br#""2020-01-01T00:00:00Z""#).unwrap();
        assert_eq!(tm, new_year_2020());
    }

    #[test]
    fn test_each_attempt_sees_the_raw_value() {
        // millis reads the number as an integer and fails; seconds must still see it whole
        let dec = try_decoders(unix_millis(), [unix_seconds()]);
        let tm = decode(&dec, b"1577836800.25").unwrap();
        assert_eq!(tm.to_utc().unwrap().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_exhaustion_surfaces_last_error() {
        let dec = try_decoders(unix_seconds(), [layout("%Y").unwrap()]);
        let err = decode(&dec, br#""not a time""#).unwrap_err();
        assert!(matches!(err, DecodeError::Layout { .. }), "{:?}", err);
    }

    #[test]
    fn test_callers_reader_is_consumed() {
        let dec = try_decoders(std_codec(), [unix_seconds()]);
        let mut iter = JsonIter::new(br#""junk" 5"#);
        assert!(dec.decode(&mut iter).is_err());
        assert_eq!(iter.read().unwrap(), serde_json::json!(5));
    }

    #[test]
    fn test_pool_released_on_every_path() {
        let pool = Arc::new(IterPool::new(4));
        let dec = try_decoders_in(pool.clone(), std_codec(), [unix_millis()]);

        decode(&dec, br#""2020-01-01T00:00:00Z""#).unwrap();
        assert_eq!(pool.borrowed(), 0);

        decode(&dec, b"1577836800000").unwrap();
        assert_eq!(pool.borrowed(), 0);

        decode(&dec, b"true").unwrap_err();
        assert_eq!(pool.borrowed(), 0);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_works_inside_joined_codec() {
        let codec = join(try_decoders(unix_millis(), [std_codec()]), std_codec());
        let tm = codec.decode_json(br#""2020-01-01T00:00:00Z""#).unwrap();
        assert_eq!(codec.encode(tm), serde_json::json!("2020-01-01T00:00:00Z"));
    }
}
