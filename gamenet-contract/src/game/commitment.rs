//! Commitments
//!
//! A player's committed secret. One per committer: the committer identity
//! is the whole key.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::key::RecordKey;
use crate::error::Result;
use crate::record::{LedgerRecord, VersionedRecord};

/// Commitment state marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum CommitmentState {
    /// Committed, secret not usable yet.
    Committed = 1,
    /// Open: the secret may be combined into alpha.
    Opened = 2,
}

impl TryFrom<u8> for CommitmentState {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Committed),
            2 => Ok(Self::Opened),
            other => Err(format!("invalid commitment state {}", other)),
        }
    }
}

impl From<CommitmentState> for u8 {
    fn from(state: CommitmentState) -> Self {
        state as u8
    }
}

impl fmt::Display for CommitmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed => f.write_str("COMMITTED"),
            Self::Opened => f.write_str("OPENED"),
        }
    }
}

/// A committed secret held on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    key: RecordKey,
    current_state: Option<CommitmentState>,
    committer: String,
    random_string: String,
    commit_date_time: String,
}

impl Commitment {
    /// Build a commitment with no state set.
    pub fn create_instance(
        committer: impl Into<String>,
        random_string: impl Into<String>,
        commit_date_time: impl Into<String>,
    ) -> Result<Self> {
        let committer = committer.into();
        Ok(Self {
            key: Self::make_key(&committer)?,
            current_state: None,
            committer,
            random_string: random_string.into(),
            commit_date_time: commit_date_time.into(),
        })
    }

    /// Key of `committer`'s commitment.
    pub fn make_key(committer: &str) -> Result<RecordKey> {
        RecordKey::new([committer])
    }

    /// Committer identity.
    pub fn committer(&self) -> &str {
        &self.committer
    }

    /// Committed secret.
    pub fn random_string(&self) -> &str {
        &self.random_string
    }

    /// Commit timestamp as supplied by the caller.
    pub fn commit_date_time(&self) -> &str {
        &self.commit_date_time
    }

    /// Current state, if the contract has set one.
    pub fn current_state(&self) -> Option<CommitmentState> {
        self.current_state
    }

    /// Mark as committed.
    pub fn set_committed(&mut self) {
        self.current_state = Some(CommitmentState::Committed);
    }

    /// Mark as opened.
    pub fn set_opened(&mut self) {
        self.current_state = Some(CommitmentState::Opened);
    }

    /// Whether the commitment is COMMITTED.
    pub fn is_committed(&self) -> bool {
        self.current_state == Some(CommitmentState::Committed)
    }

    /// Whether the commitment is OPENED.
    pub fn is_opened(&self) -> bool {
        self.current_state == Some(CommitmentState::Opened)
    }
}

impl VersionedRecord for Commitment {
    const TYPE_TAG: &'static str = "org.gamenet.commitment";

    fn key(&self) -> &RecordKey {
        &self.key
    }

    fn key_from_fields(&self) -> Result<RecordKey> {
        Self::make_key(&self.committer)
    }

    fn into_variant(self) -> LedgerRecord {
        LedgerRecord::Commitment(self)
    }

    fn from_variant(record: LedgerRecord) -> std::result::Result<Self, LedgerRecord> {
        match record {
            LedgerRecord::Commitment(c) => Ok(c),
            other => Err(other),
        }
    }
}
