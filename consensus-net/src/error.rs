//! Error types for the consensus message codec.

use {crate::message::ConsensusMessageType, dbft_primitives::CodecError, thiserror::Error};

/// Errors that can occur while decoding or verifying consensus messages.
///
/// Every variant means the offending message should be dropped; none of
/// them leave partially decoded state behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusNetError {
    /// Truncated input or an over-long length prefix.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The header's type tag is not a known consensus message type.
    #[error("unknown consensus message type 0x{0:02x}")]
    UnknownMessageType(u8),

    /// The byte separating the unsigned body from the witness was not 1.
    #[error("validation byte not 1: got {0}")]
    InvalidValidationByte(u8),

    /// An envelope names a validator beyond the configured validator count.
    #[error("validator index {index} exceeds validator count {validators_count}")]
    ValidatorIndexOutOfRange { index: u8, validators_count: usize },

    /// A consensus data record names a primary beyond the configured validator count.
    #[error("primary index {index} exceeds validator count {validators_count}")]
    PrimaryIndexOutOfRange { index: u8, validators_count: usize },

    /// The claimed validator is not part of the next block's validator set.
    #[error("validator index {index} is out of range for {validators} next-block validators")]
    ValidatorNotInSet { index: u8, validators: usize },

    /// The header decoded, but no body layout is registered for its type.
    #[error("no decoder registered for {0} messages")]
    NoMessageDecoder(ConsensusMessageType),
}

/// Convenience result type for consensus codec operations.
pub type Result<T> = std::result::Result<T, ConsensusNetError>;
