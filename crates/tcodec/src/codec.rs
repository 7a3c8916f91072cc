use std::fmt;
use std::sync::Arc;

use chrono::FixedOffset;
use serde_json::Value;

use crate::error::DecodeError;
use crate::iter::JsonIter;
use crate::pool::shared_pool;
use crate::time::Time;

/// Decodes a [`Time`] from the next value of a [`JsonIter`].
///
/// Implementations must consume the value even when they reject it.
pub trait TimeDecoder: Send + Sync + fmt::Debug {
    fn decode_time(&self, iter: &mut JsonIter) -> Result<Time, DecodeError>;
}

/// Encodes a [`Time`] as a JSON value. Zero must encode as `null`.
pub trait TimeEncoder: Send + Sync + fmt::Debug {
    fn encode_time(&self, tm: Time) -> Value;
}

/// A shareable decoder, optionally forcing decoded times into a fixed offset.
#[derive(Clone, Debug)]
pub struct Decoder {
    inner: Arc<dyn TimeDecoder>,
    offset: Option<FixedOffset>,
}

impl Decoder {
    pub fn new<D: TimeDecoder + 'static>(decoder: D) -> Self {
        Self {
            inner: Arc::new(decoder),
            offset: None,
        }
    }

    /// Offset forced by a `decode_in` override, if any.
    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    pub fn decode(&self, iter: &mut JsonIter) -> Result<Time, DecodeError> {
        let tm = self.inner.decode_time(iter)?;
        Ok(match self.offset {
            Some(offset) => tm.in_offset(offset),
            None => tm,
        })
    }
}

impl TimeDecoder for Decoder {
    fn decode_time(&self, iter: &mut JsonIter) -> Result<Time, DecodeError> {
        self.decode(iter)
    }
}

/// A shareable encoder, optionally converting times into a fixed offset first.
#[derive(Clone, Debug)]
pub struct Encoder {
    inner: Arc<dyn TimeEncoder>,
    offset: Option<FixedOffset>,
}

impl Encoder {
    pub fn new<E: TimeEncoder + 'static>(encoder: E) -> Self {
        Self {
            inner: Arc::new(encoder),
            offset: None,
        }
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    pub fn encode(&self, tm: Time) -> Value {
        let tm = match self.offset {
            Some(offset) => tm.in_offset(offset),
            None => tm,
        };
        self.inner.encode_time(tm)
    }
}

impl TimeEncoder for Encoder {
    fn encode_time(&self, tm: Time) -> Value {
        self.encode(tm)
    }
}

/// A decoder/encoder pair.
///
/// Always stored split, so joining an existing codec picks its halves
/// instead of nesting it.
#[derive(Clone, Debug)]
pub struct TimeCodec {
    decoder: Decoder,
    encoder: Encoder,
}

impl TimeCodec {
    /// Build a codec from a strategy that both decodes and encodes.
    pub fn new<C>(strategy: C) -> Self
    where
        C: TimeDecoder + TimeEncoder + 'static,
    {
        let shared = Arc::new(strategy);
        Self {
            decoder: Decoder {
                inner: shared.clone(),
                offset: None,
            },
            encoder: Encoder {
                inner: shared,
                offset: None,
            },
        }
    }

    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn decode(&self, iter: &mut JsonIter) -> Result<Time, DecodeError> {
        self.decoder.decode(iter)
    }

    pub fn encode(&self, tm: Time) -> Value {
        self.encoder.encode(tm)
    }

    /// Decode one raw JSON value using a reader from the shared pool.
    pub fn decode_json(&self, raw: &[u8]) -> Result<Time, DecodeError> {
        let pool = shared_pool();
        let mut iter = pool.borrow_iter(raw);
        self.decode(&mut iter)
    }

    /// Force `offset` on all decoded and encoded timestamps.
    ///
    /// Replaces any override applied earlier.
    pub fn in_offset(self, offset: FixedOffset) -> Self {
        Self {
            decoder: decode_in(offset, self.decoder),
            encoder: encode_in(offset, self.encoder),
        }
    }
}

impl From<TimeCodec> for Decoder {
    fn from(codec: TimeCodec) -> Self {
        codec.decoder
    }
}

impl From<&TimeCodec> for Decoder {
    fn from(codec: &TimeCodec) -> Self {
        codec.decoder.clone()
    }
}

impl From<TimeCodec> for Encoder {
    fn from(codec: TimeCodec) -> Self {
        codec.encoder
    }
}

impl From<&TimeCodec> for Encoder {
    fn from(codec: &TimeCodec) -> Self {
        codec.encoder.clone()
    }
}

/// Compose a codec from an independent decoder and encoder.
pub fn join(decoder: impl Into<Decoder>, encoder: impl Into<Encoder>) -> TimeCodec {
    TimeCodec {
        decoder: decoder.into(),
        encoder: encoder.into(),
    }
}

/// Decompose a codec into its decoder and encoder.
pub fn split(codec: TimeCodec) -> (Decoder, Encoder) {
    (codec.decoder, codec.encoder)
}

/// Force `offset` on all decoded timestamps.
pub fn decode_in(offset: FixedOffset, decoder: impl Into<Decoder>) -> Decoder {
    Decoder {
        offset: Some(offset),
        ..decoder.into()
    }
}

/// Force `offset` on all encoded timestamps.
pub fn encode_in(offset: FixedOffset, encoder: impl Into<Encoder>) -> Encoder {
    Encoder {
        offset: Some(offset),
        ..encoder.into()
    }
}
