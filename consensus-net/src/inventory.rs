//! Inventory classification and witness-verification hooks.
//!
//! The gossip layer routes and deduplicates objects by [`InventoryType`] and
//! hash; the witness checker asks each object which script hashes must have
//! signed it.

use {
    crate::error::Result,
    dbft_primitives::{EcPoint, Serializable, UInt160, UInt256},
    std::fmt,
};

/// Kind of object announced on the gossip network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InventoryType {
    Tx = 0x2b,
    Block = 0x2c,
    Consensus = 0x2d,
}

impl fmt::Display for InventoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tx => write!(f, "tx"),
            Self::Block => write!(f, "block"),
            Self::Consensus => write!(f, "consensus"),
        }
    }
}

/// Ledger state needed to decide who may sign a consensus message.
pub trait ValidatorSnapshot {
    /// Validators for the block after the snapshot's tip, in index order.
    fn next_block_validators(&self) -> Vec<EcPoint>;
}

impl ValidatorSnapshot for Vec<EcPoint> {
    fn next_block_validators(&self) -> Vec<EcPoint> {
        self.clone()
    }
}

/// A signed object that can be announced, fetched and verified.
pub trait Inventory: Serializable {
    fn inventory_type(&self) -> InventoryType;

    /// Network-salted identity of the object.
    fn hash(&self, magic: u32) -> UInt256;

    /// Script hashes whose witnesses must verify for the object to be valid.
    fn script_hashes_for_verifying(&self, snapshot: &dyn ValidatorSnapshot) -> Result<Vec<UInt160>>;
}
