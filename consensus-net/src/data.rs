//! Block-proposal metadata carried by prepare requests.

use {
    crate::error::{ConsensusNetError, Result},
    dbft_primitives::{hash::double_sha256, BinaryReader, BinaryWriter, Serializable, UInt256},
    dbft_settings::ConfigurationStore,
};

/// Primary index and nonce of a proposed block.
///
/// Wire format: `[primary_index: u8][nonce: u64-le]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsensusData {
    /// Index of the speaker (primary) in the validator list.
    pub primary_index: u8,
    pub nonce: u64,
}

impl ConsensusData {
    /// Wire size in bytes.
    pub const SIZE: usize = 9;

    pub fn new(primary_index: u8, nonce: u64) -> Self {
        Self {
            primary_index,
            nonce,
        }
    }

    /// Decode a record, rejecting a primary index at or beyond the
    /// validator count currently configured in `settings`.
    pub fn deserialize(reader: &mut BinaryReader<'_>, settings: &ConfigurationStore) -> Result<Self> {
        let primary_index = reader.read_u8()?;
        let validators_count = settings.validators_count();
        if usize::from(primary_index) >= validators_count {
            return Err(ConsensusNetError::PrimaryIndexOutOfRange {
                index: primary_index,
                validators_count,
            });
        }
        let nonce = reader.read_u64()?;
        Ok(Self {
            primary_index,
            nonce,
        })
    }

    pub fn from_bytes(data: &[u8], settings: &ConfigurationStore) -> Result<Self> {
        Self::deserialize(&mut BinaryReader::new(data), settings)
    }

    /// `SHA256(SHA256(serialized record))`.
    pub fn hash(&self) -> UInt256 {
        double_sha256(&self.to_array())
    }
}

impl Serializable for ConsensusData {
    fn size(&self) -> usize {
        Self::SIZE
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_u8(self.primary_index);
        writer.write_u64(self.nonce);
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert_matches::assert_matches, serde_json::json};

    fn store_with_validators(validators_count: usize) -> ConfigurationStore {
        let store = ConfigurationStore::default();
        store
            .merge(json!({ "network": { "validators_count": validators_count } }))
            .unwrap();
        store
    }

    #[test]
    fn test_wire_layout() {
        let data = ConsensusData::new(0, 42);
        assert_eq!(
            data.to_array(),
            vec![0x00, 0x2a, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
        assert_eq!(data.size(), ConsensusData::SIZE);
    }

    #[test]
    fn test_roundtrip_with_one_validator() {
        let store = ConfigurationStore::default();
        let data = ConsensusData::new(0, 42);
        let decoded = ConsensusData::from_bytes(&data.to_array(), &store).unwrap();
        assert_eq!(decoded.nonce, 42);
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_rejected_with_zero_validators() {
        let store = store_with_validators(0);
        let bytes = ConsensusData::new(0, 42).to_array();
        assert_matches!(
            ConsensusData::from_bytes(&bytes, &store),
            Err(ConsensusNetError::PrimaryIndexOutOfRange {
                index: 0,
                validators_count: 0
            })
        );
    }

    #[test]
    fn test_primary_index_bound() {
        let store = store_with_validators(4);
        assert!(ConsensusData::from_bytes(&ConsensusData::new(3, 1).to_array(), &store).is_ok());
        assert_matches!(
            ConsensusData::from_bytes(&ConsensusData::new(4, 1).to_array(), &store),
            Err(ConsensusNetError::PrimaryIndexOutOfRange { index: 4, .. })
        );
    }

    #[test]
    fn test_truncated_nonce() {
        let store = ConfigurationStore::default();
        assert_matches!(
            ConsensusData::from_bytes(&[0x00, 0x01, 0x02], &store),
            Err(ConsensusNetError::Codec(_))
        );
    }

    #[test]
    fn test_hash() {
        let data = ConsensusData::new(0, 42);
        assert_eq!(
            hex::encode(data.hash().as_bytes()),
            "712771e884d69004e5f382913e7dec86cb92a717fa2d7a0a1b1d420df58e43a3"
        );
        assert_eq!(data.hash(), data.hash());
        assert_ne!(data.hash(), ConsensusData::new(0, 43).hash());
    }
}
