//! Standard verification scripts and script hashes.

use crate::{
    ecpoint::EcPoint,
    hash::{hash160, sha256},
    serialization::BinaryWriter,
    uint::UInt160,
};

/// VM opcodes emitted by the script builders in this module.
pub mod opcode {
    pub const PUSHNULL: u8 = 0x0B;
    pub const PUSHDATA1: u8 = 0x0C;
    pub const SYSCALL: u8 = 0x41;
}

/// Interop service that checks a single secp256r1 signature.
pub const VERIFY_WITH_ECDSA_SECP256R1: &str = "Neo.Crypto.VerifyWithECDsaSecp256r1";

/// Interop service id: the first four bytes of `SHA256(name)`, read little-endian.
pub fn syscall_id(name: &str) -> u32 {
    let digest = sha256(name.as_bytes());
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Single-signature verification script for `key`.
///
/// ```text
/// PUSHDATA1 0x21 <33-byte key>  PUSHNULL  SYSCALL <VerifyWithECDsaSecp256r1>
/// ```
pub fn signature_redeem_script(key: &EcPoint) -> Vec<u8> {
    let mut writer = BinaryWriter::with_capacity(40);
    writer.write_u8(opcode::PUSHDATA1);
    writer.write_u8(EcPoint::COMPRESSED_LEN as u8);
    writer.write_bytes(key.as_bytes());
    writer.write_u8(opcode::PUSHNULL);
    writer.write_u8(opcode::SYSCALL);
    writer.write_u32(syscall_id(VERIFY_WITH_ECDSA_SECP256R1));
    writer.into_inner()
}

/// Address-like identifier of a script.
pub fn to_script_hash(script: &[u8]) -> UInt160 {
    hash160(script)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_KEY: &str = "02158c4a4810fa2a6a12f7d33d835680429e1a68ae61161c5b3fbc98c7f1f17765";

    #[test]
    fn test_syscall_id() {
        assert_eq!(syscall_id(VERIFY_WITH_ECDSA_SECP256R1), 0x780d_4495);
    }

    #[test]
    fn test_signature_redeem_script() {
        let key = EcPoint::from_hex(DEFAULT_KEY).unwrap();
        let script = signature_redeem_script(&key);
        assert_eq!(script.len(), 40);
        assert_eq!(
            hex::encode(&script),
            "0c2102158c4a4810fa2a6a12f7d33d835680429e1a68ae61161c5b3fbc98c7f1f177650b4195440d78"
        );
    }

    #[test]
    fn test_script_hash_of_default_validator() {
        let key = EcPoint::from_hex(DEFAULT_KEY).unwrap();
        let hash = to_script_hash(&signature_redeem_script(&key));
        assert_eq!(hex::encode(hash.as_bytes()), "3c116ff82eccbf3c4868140b2e207fc2511ac783");
        assert_eq!(hash.to_string(), "0x83c71a51c27f202e0b1468483cbfcc2ef86f113c");
    }
}
