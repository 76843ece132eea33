//! Wire primitives shared by the dBFT settings and consensus crates.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`serialization`] | `BinaryReader` / `BinaryWriter`, var-int framing, codec traits |
//! | [`uint`]          | `UInt160` / `UInt256` fixed-size identifiers |
//! | [`hash`]          | SHA-256, double SHA-256, RIPEMD160(SHA256) |
//! | [`ecpoint`]       | secp256r1 public keys in compressed SEC1 form |
//! | [`witness`]       | invocation / verification script pair |
//! | [`script`]        | signature verification script and script hashes |
//! | [`error`]         | Crate-wide error enum |
//!
//! All multi-byte integers are little-endian on the wire.

pub mod ecpoint;
pub mod error;
pub mod hash;
pub mod script;
pub mod serialization;
pub mod uint;
pub mod witness;

pub use {
    ecpoint::EcPoint,
    error::{CodecError, Result},
    serialization::{BinaryReader, BinaryWriter, Deserializable, Serializable},
    uint::{UInt160, UInt256},
    witness::Witness,
};
