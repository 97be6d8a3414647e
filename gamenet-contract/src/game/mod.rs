//! Game Records and Contract
//!
//! The two record types the protocol stores and the handlers that move
//! them through their states.

pub mod commitment;
pub mod player_update;
pub mod contract;

// Re-export key types
pub use commitment::{Commitment, CommitmentState};
pub use player_update::{PlayerUpdate, UpdateState};
pub use contract::{GameContract, GameContext};
