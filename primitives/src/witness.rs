//! Signature proof attached to signed wire objects.

use crate::{
    error::Result,
    script::to_script_hash,
    serialization::{var_size, BinaryReader, BinaryWriter, Deserializable, Serializable},
    uint::UInt160,
};

/// Upper bound on an invocation script (pushes for up to 10 signatures plus overhead).
pub const MAX_INVOCATION_SCRIPT: usize = 664;
/// Upper bound on a verification script.
pub const MAX_VERIFICATION_SCRIPT: usize = 360;

/// An invocation/verification script pair.
///
/// Wire format: `[invocation: var-bytes][verification: var-bytes]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Witness {
    /// Pushes the signature(s) onto the evaluation stack.
    pub invocation_script: Vec<u8>,
    /// Checks the pushed signature(s) against a key.
    pub verification_script: Vec<u8>,
}

impl Witness {
    pub fn new(invocation_script: Vec<u8>, verification_script: Vec<u8>) -> Self {
        Self {
            invocation_script,
            verification_script,
        }
    }

    /// Script hash of the verification script.
    pub fn script_hash(&self) -> UInt160 {
        to_script_hash(&self.verification_script)
    }
}

impl Serializable for Witness {
    fn size(&self) -> usize {
        var_size(self.invocation_script.len()).saturating_add(var_size(self.verification_script.len()))
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_var_bytes(&self.invocation_script);
        writer.write_var_bytes(&self.verification_script);
    }
}

impl Deserializable for Witness {
    fn deserialize(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let invocation_script = reader.read_var_bytes(MAX_INVOCATION_SCRIPT)?;
        let verification_script = reader.read_var_bytes(MAX_VERIFICATION_SCRIPT)?;
        Ok(Self {
            invocation_script,
            verification_script,
        })
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::error::CodecError, assert_matches::assert_matches};

    #[test]
    fn test_wire_layout() {
        let witness = Witness::new(vec![0xAA, 0xBB], vec![0xCC]);
        assert_eq!(witness.to_array(), vec![0x02, 0xAA, 0xBB, 0x01, 0xCC]);
        assert_eq!(witness.size(), 5);
    }

    #[test]
    fn test_empty_witness() {
        let witness = Witness::default();
        assert_eq!(witness.to_array(), vec![0x00, 0x00]);
        assert_eq!(Witness::deserialize_from_bytes(&[0x00, 0x00]).unwrap(), witness);
    }

    #[test]
    fn test_oversized_verification_script_rejected() {
        let witness = Witness::new(vec![], vec![0u8; MAX_VERIFICATION_SCRIPT + 1]);
        assert_matches!(
            Witness::deserialize_from_bytes(&witness.to_array()),
            Err(CodecError::LengthExceeded { .. })
        );
    }
}
