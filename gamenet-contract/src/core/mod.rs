//! Core primitives.
//!
//! Key derivation and hashing shared by records, collections and the ledger.

pub mod key;
pub mod hash;

// Re-export core types
pub use key::{RecordKey, composite_key, KEY_DELIMITER, COMPOSITE_SEPARATOR};
pub use hash::{StateHash, LedgerHasher, update_digest};
