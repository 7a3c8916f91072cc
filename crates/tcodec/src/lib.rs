/// Timestamp codecs for JSON log fields
///
/// This module decodes and encodes timestamps from/to JSON using
/// interchangeable strategies that can be composed at startup.
///
/// # Architecture
///
/// - `time.rs`: The `Time` value with an explicit zero state
/// - `iter.rs`: Scratch JSON reader used by decoders
/// - `pool.rs`: Reusable pool of scratch readers
/// - `codec.rs`: Decoder/encoder traits and the join/split/timezone combinators
/// - `formats/`: Individual timestamp strategies (epoch, layout, standard)
/// - `fallback.rs`: Decoder fallback chains
/// - `registry.rs`: Named codec selectors
/// - `serde_utils.rs`: Glue for `#[serde(with = ...)]` fields
///
/// # Guarantees
///
/// All codecs:
/// - Encode the zero time as JSON `null`
/// - Decode `null` and `""` as the zero time, never as an error
/// - Consume the JSON value they were handed, even when its shape is rejected

pub mod time;
pub mod iter;
pub mod pool;
pub mod codec;
pub mod formats;
pub mod fallback;
pub mod registry;
pub mod serde_utils;
mod error;

// Re-export commonly used types
pub use time::Time;
pub use iter::{JsonIter, ValueKind};
pub use pool::{IterPool, PooledIter, shared_pool};
pub use codec::{
    decode_in, encode_in, join, split, Decoder, Encoder, TimeCodec, TimeDecoder, TimeEncoder,
};
pub use formats::{layout, std_codec, unix_millis, unix_seconds};
pub use fallback::{try_decoders, try_decoders_in};
pub use registry::{parse_offset, CodecRegistry};
pub use error::{CodecError, DecodeError};

// Constants
pub const DEFAULT_POOL_CAPACITY: usize = 64;
pub const SELECTOR_UNIX_SECONDS: &str = "unix";
pub const SELECTOR_UNIX_MILLIS: &str = "unix_ms";
pub const SELECTOR_RFC3339: &str = "rfc3339";
pub const SELECTOR_STRFTIME_PREFIX: &str = "strftime=";
