//! Fixed-size identifiers.
//!
//! Bytes are stored in wire order. The textual form is the byte-reversed hex
//! string with a `0x` prefix, matching how block explorers print hashes and
//! script hashes.

use {
    crate::{
        error::{CodecError, Result},
        serialization::{BinaryReader, BinaryWriter, Deserializable, Serializable},
    },
    std::{fmt, str::FromStr},
};

macro_rules! define_uint {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Encoded length in bytes.
            pub const LEN: usize = $len;

            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub const fn zero() -> Self {
                Self([0u8; $len])
            }

            pub fn from_slice(bytes: &[u8]) -> Result<Self> {
                <[u8; $len]>::try_from(bytes)
                    .map(Self)
                    .map_err(|_| CodecError::InvalidLength {
                        expected: $len,
                        actual: bytes.len(),
                    })
            }

            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub const fn to_bytes(self) -> [u8; $len] {
                self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let mut reversed = self.0;
                reversed.reverse();
                write!(f, "0x{}", hex::encode(reversed))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = CodecError;

            /// Parse the reversed-hex form produced by `Display`.
            fn from_str(s: &str) -> Result<Self> {
                let digits = s.strip_prefix("0x").unwrap_or(s);
                let mut bytes = hex::decode(digits)?;
                bytes.reverse();
                Self::from_slice(&bytes)
            }
        }

        impl Serializable for $name {
            fn size(&self) -> usize {
                Self::LEN
            }

            fn serialize(&self, writer: &mut BinaryWriter) {
                writer.write_bytes(&self.0);
            }
        }

        impl Deserializable for $name {
            fn deserialize(reader: &mut BinaryReader<'_>) -> Result<Self> {
                reader.read_array().map(Self)
            }
        }
    };
}

define_uint!(
    /// 160-bit identifier, used for script hashes.
    UInt160,
    20
);

define_uint!(
    /// 256-bit identifier, used for block and message hashes.
    UInt256,
    32
);
