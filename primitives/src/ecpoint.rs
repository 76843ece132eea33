//! secp256r1 public keys.
//!
//! Keys travel as 33-byte compressed SEC1 encodings. Decoding validates that
//! the bytes describe a point on the curve; uncompressed input is accepted and
//! normalised to the compressed form.

use {
    crate::{
        error::{CodecError, Result},
        serialization::{BinaryReader, BinaryWriter, Deserializable, Serializable},
    },
    p256::{elliptic_curve::sec1::ToEncodedPoint, PublicKey},
    std::fmt,
};

/// A validated secp256r1 public key in compressed form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EcPoint([u8; EcPoint::COMPRESSED_LEN]);

impl EcPoint {
    pub const COMPRESSED_LEN: usize = 33;
    pub const UNCOMPRESSED_LEN: usize = 65;

    /// Decode a compressed or uncompressed SEC1 encoding.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let key = PublicKey::from_sec1_bytes(bytes).map_err(|_| {
            CodecError::InvalidEcPoint(format!(
                "{} bytes do not encode a secp256r1 point",
                bytes.len()
            ))
        })?;
        let encoded = key.to_encoded_point(true);
        <[u8; Self::COMPRESSED_LEN]>::try_from(encoded.as_bytes())
            .map(Self)
            .map_err(|_| CodecError::InvalidEcPoint("compression produced wrong length".into()))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Self::decode(&hex::decode(s)?)
    }

    /// The 33-byte compressed encoding.
    pub fn as_bytes(&self) -> &[u8; Self::COMPRESSED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for EcPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for EcPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcPoint({})", self.to_hex())
    }
}

impl Serializable for EcPoint {
    fn size(&self) -> usize {
        Self::COMPRESSED_LEN
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_bytes(&self.0);
    }
}

impl Deserializable for EcPoint {
    fn deserialize(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let len = match reader.clone().read_u8()? {
            0x02 | 0x03 => Self::COMPRESSED_LEN,
            0x04 => Self::UNCOMPRESSED_LEN,
            prefix => {
                return Err(CodecError::InvalidEcPoint(format!(
                    "unsupported prefix 0x{prefix:02x}"
                )))
            }
        };
        Self::decode(reader.read_bytes(len)?)
    }
}
