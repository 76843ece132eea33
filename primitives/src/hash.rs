//! Hash functions used for message identities and script hashes.

use {
    crate::uint::{UInt160, UInt256},
    ripemd::Ripemd160,
    sha2::{Digest, Sha256},
};

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// `SHA256(SHA256(data))`, the identity of every signed wire object.
pub fn double_sha256(data: &[u8]) -> UInt256 {
    UInt256::new(sha256(&sha256(data)))
}

/// `RIPEMD160(SHA256(data))`.
pub fn hash160(data: &[u8]) -> UInt160 {
    UInt160::new(Ripemd160::digest(sha256(data)).into())
}
