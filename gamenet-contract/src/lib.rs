//! # GameNet Anti-Cheat Contract
//!
//! Commit-reveal cheat detection for two-party game updates, run as
//! transactions against a versioned key/value ledger.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    GAMENET CONTRACT                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Keys and hashing                          │
//! │  ├── key.rs      - Record keys, ledger composite keys        │
//! │  └── hash.rs     - World-state fingerprints, update digests  │
//! │                                                              │
//! │  record/         - Ledger records                            │
//! │  ├── mod.rs      - VersionedRecord trait                     │
//! │  ├── variant.rs  - Closed record set, tagged JSON codec      │
//! │  └── collection.rs - Namespaced add/get/update               │
//! │                                                              │
//! │  game/           - Protocol                                  │
//! │  ├── commitment.rs    - Committed secrets                    │
//! │  ├── player_update.rs - Issued, checkable updates            │
//! │  └── contract.rs      - commit/issue/check/queryAlpha        │
//! │                                                              │
//! │  ledger/         - Reference substrate (in-memory)           │
//! │  ├── world.rs    - Versioned state, MVCC validation          │
//! │  └── peer.rs     - Endorse/commit, transaction log           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity
//!
//! A handler's writes are buffered and applied together, or not at all.
//! Failed handlers and conflicting commits leave the ledger untouched.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod ledger;
pub mod record;

// Re-export commonly used types
pub use config::ContractConfig;
pub use crate::core::key::RecordKey;
pub use error::{ContractError, ErrorKind};
pub use game::{Commitment, PlayerUpdate, GameContract, GameContext};
pub use ledger::{LedgerPeer, LedgerStub, WorldState};
pub use record::{LedgerRecord, RecordCollection, VersionedRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
