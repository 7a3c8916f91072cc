/// Individual timestamp strategies

pub mod unix;
pub mod layout;
pub mod rfc3339;

// Re-export strategy implementations
pub use unix::{UnixMilliseconds, UnixSeconds};
pub use layout::Layout;
pub use rfc3339::Rfc3339;

use crate::codec::TimeCodec;
use crate::error::CodecError;

/// Seconds since the UNIX epoch, fractions kept to the microsecond.
pub fn unix_seconds() -> TimeCodec {
    TimeCodec::new(UnixSeconds)
}

/// Milliseconds since the UNIX epoch.
pub fn unix_millis() -> TimeCodec {
    TimeCodec::new(UnixMilliseconds)
}

/// Strings in a strftime `layout`.
pub fn layout(layout: &str) -> Result<TimeCodec, CodecError> {
    Layout::new(layout).map(TimeCodec::new)
}

/// Strict RFC 3339 on decode, RFC 3339 with sub-second precision on encode.
pub fn std_codec() -> TimeCodec {
    TimeCodec::new(Rfc3339)
}
