use serde::de::IgnoredAny;
use serde_json::Value;

use crate::error::DecodeError;

/// Shape of the next JSON value in a [`JsonIter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
    /// Unrecognized leading byte
    Invalid,
    /// No more input
    End,
}

/// Scratch JSON reader handed to time decoders.
///
/// Owns a private copy of the raw bytes so that a failed decode attempt can
/// never leak partial consumption into the next one. Instances are reused
/// through [`crate::IterPool`]; `reset_bytes` keeps the allocation.
#[derive(Debug, Default)]
pub struct JsonIter {
    buf: Vec<u8>,
    pos: usize,
}

impl JsonIter {
    pub fn new(raw: &[u8]) -> Self {
        let mut iter = Self::default();
        iter.reset_bytes(raw);
        iter
    }

    /// Reload the reader with `raw`, rewinding to the start.
    pub fn reset_bytes(&mut self, raw: &[u8]) {
        self.buf.clear();
        self.buf.extend_from_slice(raw);
        self.pos = 0;
    }

    /// Drop the buffered bytes, keeping the allocation.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.pos = 0;
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// True when only whitespace is left.
    pub fn is_exhausted(&mut self) -> bool {
        self.skip_whitespace();
        self.pos >= self.buf.len()
    }

    /// Peek at the shape of the next value without consuming it.
    pub fn what_is_next(&mut self) -> ValueKind {
        self.skip_whitespace();
        match self.buf.get(self.pos) {
            None => ValueKind::End,
            Some(b'n') => ValueKind::Null,
            Some(b't') | Some(b'f') => ValueKind::Bool,
            Some(b'"') => ValueKind::String,
            Some(b'-') | Some(b'0'..=b'9') => ValueKind::Number,
            Some(b'[') => ValueKind::Array,
            Some(b'{') => ValueKind::Object,
            Some(_) => ValueKind::Invalid,
        }
    }

    /// Consume exactly one JSON value, whatever its shape.
    pub fn read(&mut self) -> Result<Value, DecodeError> {
        self.next_value::<Value>()
    }

    /// Consume one JSON value without materializing it.
    pub fn skip(&mut self) -> Result<(), DecodeError> {
        self.next_value::<IgnoredAny>().map(|_| ())
    }

    /// Consume one JSON value and return its raw bytes.
    pub fn skip_and_return_bytes(&mut self) -> Result<&[u8], DecodeError> {
        self.skip_whitespace();
        let start = self.pos;
        self.skip()?;
        Ok(&self.buf[start..self.pos])
    }

    fn next_value<T: serde::de::DeserializeOwned>(&mut self) -> Result<T, DecodeError> {
        self.skip_whitespace();
        if self.pos >= self.buf.len() {
            return Err(DecodeError::UnexpectedEnd);
        }
        let mut stream = serde_json::Deserializer::from_slice(&self.buf[self.pos..]).into_iter::<T>();
        match stream.next() {
            Some(Ok(value)) => {
                let consumed = stream.byte_offset();
                self.pos += consumed;
                Ok(value)
            }
            Some(Err(e)) => {
                let offset = self.pos;
                // Never stay parked on bad input.
                self.pos = self.buf.len();
                Err(DecodeError::Syntax {
                    offset,
                    reason: e.to_string(),
                })
            }
            None => Err(DecodeError::UnexpectedEnd),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.buf.len() && self.buf[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }
}
