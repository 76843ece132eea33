//! Consensus message header and per-type body dispatch.
//!
//! Every consensus message carried inside a [`ConsensusPayload`]'s `data`
//! starts with the same two bytes:
//!
//! ```text
//! [type: u8][view_number: u8][body: type-specific]
//! ```
//!
//! Body layouts are not defined by this crate. Callers that know them
//! register a decoder per [`ConsensusMessageType`] in a
//! [`MessageDecoderRegistry`].
//!
//! [`ConsensusPayload`]: crate::payload::ConsensusPayload

use {
    crate::error::{ConsensusNetError, Result},
    dbft_primitives::{BinaryReader, BinaryWriter, Serializable},
    log::debug,
    std::{any::Any, collections::HashMap, fmt},
};

// ── Message type ────────────────────────────────────────────────────────────

/// Discriminator of a consensus message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConsensusMessageType {
    ChangeView = 0x00,
    PrepareRequest = 0x20,
    PrepareResponse = 0x21,
    Commit = 0x30,
    RecoveryRequest = 0x40,
    RecoveryMessage = 0x41,
}

impl ConsensusMessageType {
    pub const ALL: [Self; 6] = [
        Self::ChangeView,
        Self::PrepareRequest,
        Self::PrepareResponse,
        Self::Commit,
        Self::RecoveryRequest,
        Self::RecoveryMessage,
    ];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ConsensusMessageType {
    type Error = ConsensusNetError;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0x00 => Ok(Self::ChangeView),
            0x20 => Ok(Self::PrepareRequest),
            0x21 => Ok(Self::PrepareResponse),
            0x30 => Ok(Self::Commit),
            0x40 => Ok(Self::RecoveryRequest),
            0x41 => Ok(Self::RecoveryMessage),
            other => Err(ConsensusNetError::UnknownMessageType(other)),
        }
    }
}

impl fmt::Display for ConsensusMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ChangeView => "change_view",
            Self::PrepareRequest => "prepare_request",
            Self::PrepareResponse => "prepare_response",
            Self::Commit => "commit",
            Self::RecoveryRequest => "recovery_request",
            Self::RecoveryMessage => "recovery_message",
        };
        f.write_str(name)
    }
}

// ── Header ──────────────────────────────────────────────────────────────────

/// The two-byte prefix shared by all consensus messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsensusMessageHeader {
    pub message_type: ConsensusMessageType,
    pub view_number: u8,
}

impl ConsensusMessageHeader {
    /// Wire size in bytes.
    pub const SIZE: usize = 2;

    pub fn new(message_type: ConsensusMessageType, view_number: u8) -> Self {
        Self {
            message_type,
            view_number,
        }
    }

    /// Fails with [`ConsensusNetError::UnknownMessageType`] for unknown tags.
    pub fn deserialize(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let message_type = ConsensusMessageType::try_from(reader.read_u8()?)?;
        let view_number = reader.read_u8()?;
        Ok(Self {
            message_type,
            view_number,
        })
    }
}

impl Default for ConsensusMessageHeader {
    fn default() -> Self {
        Self::new(ConsensusMessageType::ChangeView, 0)
    }
}

impl Serializable for ConsensusMessageHeader {
    fn size(&self) -> usize {
        Self::SIZE
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.message_type.as_u8());
        writer.write_u8(self.view_number);
    }
}

// ── Body dispatch ───────────────────────────────────────────────────────────

/// A decoded, type-specific message body.
pub trait ConsensusMessageBody: fmt::Debug + Send + Sync {
    fn message_type(&self) -> ConsensusMessageType;

    /// Downcasting hook for consumers that know the concrete body type.
    fn as_any(&self) -> &dyn Any;
}

/// A header together with its decoded body.
#[derive(Debug)]
pub struct ConsensusMessage {
    pub header: ConsensusMessageHeader,
    pub body: Box<dyn ConsensusMessageBody>,
}

/// Decodes a body. The reader is positioned just after the header.
pub type MessageBodyDecoder =
    fn(&ConsensusMessageHeader, &mut BinaryReader<'_>) -> Result<Box<dyn ConsensusMessageBody>>;

/// Message type → body decoder table.
///
/// Starts empty; decoding a type with no registered decoder fails with
/// [`ConsensusNetError::NoMessageDecoder`].
#[derive(Default, Clone)]
pub struct MessageDecoderRegistry {
    decoders: HashMap<ConsensusMessageType, MessageBodyDecoder>,
}

impl MessageDecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the decoder for `message_type`.
    pub fn register(&mut self, message_type: ConsensusMessageType, decoder: MessageBodyDecoder) {
        self.decoders.insert(message_type, decoder);
    }

    pub fn is_registered(&self, message_type: ConsensusMessageType) -> bool {
        self.decoders.contains_key(&message_type)
    }

    /// Decode a complete consensus message from a payload's `data`.
    pub fn decode(&self, data: &[u8]) -> Result<ConsensusMessage> {
        let mut reader = BinaryReader::new(data);
        let header = ConsensusMessageHeader::deserialize(&mut reader)?;
        let Some(decoder) = self.decoders.get(&header.message_type) else {
            debug!("no decoder for {} message", header.message_type);
            return Err(ConsensusNetError::NoMessageDecoder(header.message_type));
        };
        let body = decoder(&header, &mut reader)?;
        Ok(ConsensusMessage { header, body })
    }
}

impl fmt::Debug for MessageDecoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<u8> = self.decoders.keys().map(|t| t.as_u8()).collect();
        types.sort_unstable();
        f.debug_struct("MessageDecoderRegistry")
            .field("types", &types)
            .finish()
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
