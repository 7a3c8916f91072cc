use thiserror::Error;

/// Soft, per-field decode failure.
///
/// Returned to the caller of a decoder; it never aborts anything on its own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("{codec}: invalid JSON value, expected {expected}")]
    InvalidValue {
        codec: &'static str,
        expected: &'static str,
    },

    #[error("{codec}: invalid number {input:?}: {reason}")]
    InvalidNumber {
        codec: &'static str,
        input: String,
        reason: String,
    },

    #[error("{codec}: timestamp out of range: {input}")]
    OutOfRange { codec: &'static str, input: String },

    #[error("cannot parse {input:?} with layout {layout:?}: {reason}")]
    Layout {
        layout: String,
        input: String,
        reason: String,
    },

    #[error("cannot parse {input:?} as RFC 3339: {reason}")]
    Rfc3339 { input: String, reason: String },

    #[error("malformed JSON at offset {offset}: {reason}")]
    Syntax { offset: usize, reason: String },

    #[error("unexpected end of JSON input")]
    UnexpectedEnd,

    #[error("no decoders configured")]
    NoDecoders,
}

/// Construction-time codec configuration failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Invalid layout {0:?}: contains an unsupported format specifier")]
    InvalidLayout(String),

    #[error("Empty layout")]
    EmptyLayout,

    #[error("Codec already registered: {0}")]
    Duplicate(String),

    #[error("Invalid codec name {0:?}")]
    InvalidName(String),

    #[error("Unknown codec selector: {0}")]
    Unknown(String),

    #[error("Invalid timezone {0:?}")]
    InvalidTimezone(String),
}
