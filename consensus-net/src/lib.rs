//! dBFT consensus message codec.
//!
//! Validators exchange consensus messages wrapped in a signed
//! [`ConsensusPayload`]. This crate encodes and decodes that envelope, the
//! two-byte [`ConsensusMessageHeader`] at the start of every message, and
//! the [`ConsensusData`] record carried by prepare requests.
//!
//! Decoding consults a [`ConfigurationStore`](dbft_settings::ConfigurationStore)
//! for the current validator count, so the bounds checks follow
//! configuration changes made at runtime.
//!
//! ## Crate modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`payload`]   | Signed envelope, signing hash, verifying script hashes |
//! | [`message`]   | Message type, header, per-type body decoders |
//! | [`data`]      | Primary index / nonce record |
//! | [`inventory`] | Inventory kinds and the hash/verification contract |
//! | [`error`]     | Crate-wide error enum |

pub mod data;
pub mod error;
pub mod inventory;
pub mod message;
pub mod payload;

pub use {
    data::ConsensusData,
    error::{ConsensusNetError, Result},
    inventory::{Inventory, InventoryType, ValidatorSnapshot},
    message::{
        ConsensusMessage, ConsensusMessageBody, ConsensusMessageHeader, ConsensusMessageType,
        MessageBodyDecoder, MessageDecoderRegistry,
    },
    payload::ConsensusPayload,
};
