//! Error types for the wire primitives.

use thiserror::Error;

/// Errors raised while encoding or decoding wire data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended before a complete value could be read.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes the current read required.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// A length prefix or var-int exceeds the cap imposed by the caller.
    #[error("length {length} exceeds maximum {max}")]
    LengthExceeded {
        /// Decoded value.
        length: u64,
        /// Permitted maximum.
        max: u64,
    },

    /// A fixed-size value was built from a slice of the wrong length.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Bytes that do not encode a point on secp256r1.
    #[error("invalid EC point: {0}")]
    InvalidEcPoint(String),

    /// Text that is not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for CodecError {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidHex(err.to_string())
    }
}

/// Convenience result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
