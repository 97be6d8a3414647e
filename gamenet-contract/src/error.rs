//! Contract Errors
//!
//! One error type for the whole transaction path. Handlers never retry or
//! recover: every failure reaches the caller unchanged and the ledger
//! discards the transaction's pending writes.

use thiserror::Error;

/// Coarse classification of a [`ContractError`] for callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Insert over an existing key.
    DuplicateKey,
    /// Read or update of an absent key.
    NotFound,
    /// Bytes or key parts that do not form a valid record.
    MalformedRecord,
    /// Check on a player update that is no longer ISSUED.
    AlreadyChecked,
    /// Alpha requested while a commitment is not OPENED.
    CommitmentNotOpened,
    /// Concurrent write detected by the ledger.
    StoreConflict,
    /// Bad function name, argument count or configuration.
    InvalidRequest,
}

/// Errors raised by records, collections, the ledger and the contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// A record already exists under this ledger key.
    #[error("the record {key} already exists")]
    DuplicateKey {
        /// Record key (`:`-joined form).
        key: String,
    },

    /// No record exists under this ledger key.
    #[error("the record {key} does not exist")]
    NotFound {
        /// Record key (`:`-joined form).
        key: String,
    },

    /// Stored bytes do not decode to the expected record.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A key part is empty or contains a reserved delimiter.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// The player update has already left the ISSUED state.
    #[error("player update {issuer}:{update_number} already checked, current state = {state}")]
    AlreadyChecked {
        /// Update issuer.
        issuer: String,
        /// Update sequence number.
        update_number: String,
        /// State found on the record.
        state: String,
    },

    /// At least one of the two commitments is not OPENED.
    #[error("one player {player1} or {player2} has not opened the commitment")]
    CommitmentNotOpened {
        /// First player.
        player1: String,
        /// Second player.
        player2: String,
    },

    /// A key read by the transaction changed before it was committed.
    #[error("read conflict on {key}")]
    StoreConflict {
        /// Ledger key whose version changed.
        key: String,
    },

    /// The contract has no function with this name.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// Wrong number of positional arguments.
    #[error("{function} expects {expected} arguments, got {got}")]
    ArgumentCount {
        /// Function name.
        function: String,
        /// Handler arity.
        expected: usize,
        /// Arguments supplied.
        got: usize,
    },

    /// Rejected contract configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl ContractError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateKey { .. } => ErrorKind::DuplicateKey,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::MalformedRecord(_) | Self::InvalidKey(_) => ErrorKind::MalformedRecord,
            Self::AlreadyChecked { .. } => ErrorKind::AlreadyChecked,
            Self::CommitmentNotOpened { .. } => ErrorKind::CommitmentNotOpened,
            Self::StoreConflict { .. } => ErrorKind::StoreConflict,
            Self::UnknownFunction(_) | Self::ArgumentCount { .. } | Self::InvalidConfig(_) => {
                ErrorKind::InvalidRequest
            }
        }
    }
}

impl From<serde_json::Error> for ContractError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedRecord(err.to_string())
    }
}

/// Result alias for the contract crate.
pub type Result<T> = std::result::Result<T, ContractError>;
