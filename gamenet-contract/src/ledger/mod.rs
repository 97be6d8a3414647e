//! Ledger Substrate
//!
//! The contract only sees a key/value stub. Everything behind it is the
//! ledger's business: versioning, atomic commit, conflict detection.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    LEDGER                                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  LedgerStub      - get/put by key, what handlers talk to     │
//! │  world.rs        - Versioned world state + MVCC validation   │
//! │  peer.rs         - Endorse (simulate) / commit (validate)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The in-memory implementation here is the reference substrate used by
//! tests and the demo binary.

pub mod world;
pub mod peer;

pub use world::{WorldState, VersionedValue, ReadWriteSet, TxSimulator};
pub use peer::{LedgerPeer, Chaincode, Endorsement, TxRecord, TxOutcome};

use crate::error::Result;

/// Key/value access for a single transaction.
///
/// Keys are ledger composite keys. There is no scan, range or delete.
pub trait LedgerStub {
    /// Read the bytes stored under `key`.
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Whether anything is stored under `key`.
    fn state_exists(&mut self, key: &str) -> Result<bool> {
        Ok(self.get_state(key)?.is_some())
    }
}
