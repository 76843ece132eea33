//! The signed envelope that carries consensus messages between validators.
//!
//! ## Wire format
//!
//! ```text
//! unsigned body:
//!   [version: u32-le][prev_hash: 32 bytes][block_index: u32-le]
//!   [validator_index: u8][data: var-bytes]
//! signed form:
//!   [unsigned body][validation byte: 0x01][witness]
//! ```
//!
//! The envelope's identity is `SHA256(SHA256(magic: u32-le ‖ unsigned body))`,
//! recomputed from the current fields on every call.

use {
    crate::{
        error::{ConsensusNetError, Result},
        inventory::{Inventory, InventoryType, ValidatorSnapshot},
    },
    dbft_primitives::{
        hash::double_sha256,
        script::{signature_redeem_script, to_script_hash},
        serialization::var_size,
        BinaryReader, BinaryWriter, Serializable, UInt160, UInt256, Witness,
    },
    dbft_settings::ConfigurationStore,
};

/// Marker between the unsigned body and the witness.
pub const VALIDATION_BYTE: u8 = 1;

/// Largest `data` blob accepted on decode (16 MiB).
pub const MAX_DATA_SIZE: usize = 0x0100_0000;

/// Signed consensus message envelope.
///
/// `Default` yields the empty envelope (all zero, empty data and witness)
/// that callers fill in before signing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsensusPayload {
    pub version: u32,
    /// Hash of the block this message builds on.
    pub prev_hash: UInt256,
    /// Height of the block being agreed on.
    pub block_index: u32,
    /// Sender's index in the validator list.
    pub validator_index: u8,
    /// Encoded consensus message; see [`MessageDecoderRegistry`](crate::message::MessageDecoderRegistry).
    pub data: Vec<u8>,
    pub witness: Witness,
}

impl ConsensusPayload {
    /// Size of the fixed-width fields of the unsigned body.
    const FIXED_SIZE: usize = 4 + UInt256::LEN + 4 + 1;

    pub fn new(
        version: u32,
        prev_hash: UInt256,
        block_index: u32,
        validator_index: u8,
        data: Vec<u8>,
        witness: Witness,
    ) -> Self {
        Self {
            version,
            prev_hash,
            block_index,
            validator_index,
            data,
            witness,
        }
    }

    /// Encoded size of the unsigned body.
    pub fn unsigned_size(&self) -> usize {
        Self::FIXED_SIZE.saturating_add(var_size(self.data.len()))
    }

    pub fn serialize_unsigned(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.version);
        writer.write_serializable(&self.prev_hash);
        writer.write_u32(self.block_index);
        writer.write_u8(self.validator_index);
        writer.write_var_bytes(&self.data);
    }

    /// Decode the unsigned body. The returned payload has an empty witness.
    ///
    /// The validator bound is read from `settings` at call time.
    pub fn deserialize_unsigned(
        reader: &mut BinaryReader<'_>,
        settings: &ConfigurationStore,
    ) -> Result<Self> {
        let version = reader.read_u32()?;
        let prev_hash = reader.read_serializable()?;
        let block_index = reader.read_u32()?;
        let validator_index = reader.read_u8()?;
        let validators_count = settings.validators_count();
        if usize::from(validator_index) >= validators_count {
            return Err(ConsensusNetError::ValidatorIndexOutOfRange {
                index: validator_index,
                validators_count,
            });
        }
        let data = reader.read_var_bytes(MAX_DATA_SIZE)?;
        Ok(Self {
            version,
            prev_hash,
            block_index,
            validator_index,
            data,
            witness: Witness::default(),
        })
    }

    /// Decode a complete signed envelope. Nothing is returned unless every
    /// part, witness included, decoded and validated.
    pub fn deserialize(reader: &mut BinaryReader<'_>, settings: &ConfigurationStore) -> Result<Self> {
        let mut payload = Self::deserialize_unsigned(reader, settings)?;
        let validation_byte = reader.read_u8()?;
        if validation_byte != VALIDATION_BYTE {
            return Err(ConsensusNetError::InvalidValidationByte(validation_byte));
        }
        payload.witness = reader.read_serializable()?;
        Ok(payload)
    }

    pub fn from_bytes(data: &[u8], settings: &ConfigurationStore) -> Result<Self> {
        Self::deserialize(&mut BinaryReader::new(data), settings)
    }

    /// The bytes that are hashed and signed: `magic ‖ unsigned body`.
    pub fn hash_data(&self, magic: u32) -> Vec<u8> {
        let mut writer = BinaryWriter::with_capacity(self.unsigned_size().saturating_add(4));
        writer.write_u32(magic);
        self.serialize_unsigned(&mut writer);
        writer.into_inner()
    }
}

impl Serializable for ConsensusPayload {
    fn size(&self) -> usize {
        self.unsigned_size()
            .saturating_add(1)
            .saturating_add(self.witness.size())
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        self.serialize_unsigned(writer);
        writer.write_u8(VALIDATION_BYTE);
        writer.write_serializable(&self.witness);
    }
}

impl Inventory for ConsensusPayload {
    fn inventory_type(&self) -> InventoryType {
        InventoryType::Consensus
    }

    fn hash(&self, magic: u32) -> UInt256 {
        double_sha256(&self.hash_data(magic))
    }

    /// The signature-verification script hash of the validator at
    /// `validator_index` in the next block's validator set.
    fn script_hashes_for_verifying(&self, snapshot: &dyn ValidatorSnapshot) -> Result<Vec<UInt160>> {
        let validators = snapshot.next_block_validators();
        let validator = validators
            .get(usize::from(self.validator_index))
            .ok_or(ConsensusNetError::ValidatorNotInSet {
                index: self.validator_index,
                validators: validators.len(),
            })?;
        Ok(vec![to_script_hash(&signature_redeem_script(validator))])
    }
}
