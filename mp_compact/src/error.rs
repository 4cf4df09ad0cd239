use thiserror::Error;

use crate::format::Kind;

/// Errors raised while packing, unpacking or assembling an [`Object`](crate::Object).
///
/// Every error is terminal for the call that raised it. A packer or unpacker
/// that returned an error should be reset before it is used again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MpError {
    /// A fixed-capacity sink cannot take the requested bytes.
    #[error("no space remaining in buffer: needed {needed} bytes, {remaining} left")]
    CapacityExceeded { needed: usize, remaining: usize },

    /// A string, binary, array or map length does not fit in 32 bits.
    #[error("{what} size overflow: {len} exceeds the 32-bit length limit")]
    SizeOverflow { what: &'static str, len: usize },

    /// The source ran out before the value was complete.
    #[error("no bytes remaining in buffer: needed {needed} bytes, {remaining} left")]
    BufferExhausted { needed: usize, remaining: usize },

    /// The tag does not belong to the requested category.
    #[error("invalid type received: tag {tag:#04x} ({found}) where {expected} was expected")]
    InvalidType {
        tag: u8,
        found: Kind,
        expected: &'static str,
    },

    /// Decoded value is above the target type's maximum.
    #[error("value overflows numeric limit of {target}")]
    Overflow { target: &'static str },

    /// Decoded value is below the target type's minimum.
    #[error("value underflows numeric limit of {target}")]
    Underflow { target: &'static str },

    /// A fixed-size array or binary target has the wrong length.
    #[error("size mismatch: target holds {expected} elements, encoded value has {found}")]
    SizeMismatch { expected: usize, found: usize },

    /// A fixed-capacity string target is too small.
    #[error("string buffer overflow: {len} bytes into capacity {capacity}")]
    StringOverflow { len: usize, capacity: usize },

    /// A `String` target received bytes that are not UTF-8.
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    /// Registering a parent or nested object would exceed the depth limit.
    #[error("object nesting too deep: depth {depth} exceeds {max}")]
    NestingTooDeep { depth: usize, max: usize },

    /// A whole-buffer decode left bytes unread.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
}

impl MpError {
    pub(crate) fn invalid_type(tag: u8, expected: &'static str) -> Self {
        let found = crate::format::classify(tag);
        tracing::debug!(tag, %found, expected, "invalid type received");
        MpError::InvalidType {
            tag,
            found,
            expected,
        }
    }

    /// True for errors caused by running out of input, as opposed to input
    /// that is present but malformed.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, MpError::BufferExhausted { .. })
    }
}

pub type Result<T> = core::result::Result<T, MpError>;
