//! Player Updates
//!
//! An update value a player publishes (typically a digest) so an opponent
//! can later check it against what the player reveals. Keyed by
//! `(issuer, updateNumber)`.
//!
//! ```text
//! ISSUED ──proof matches──▶ CHECKED
//!    │
//!    └────proof differs───▶ CHEAT
//! ```
//!
//! CHECKED and CHEAT are terminal.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::key::RecordKey;
use crate::error::Result;
use crate::record::{LedgerRecord, VersionedRecord};

/// Player update state marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum UpdateState {
    /// Published, not yet checked.
    Issued = 1,
    /// Checked against a matching proof.
    Checked = 2,
    /// Checked against a different proof.
    Cheat = 3,
}

impl TryFrom<u8> for UpdateState {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Issued),
            2 => Ok(Self::Checked),
            3 => Ok(Self::Cheat),
            other => Err(format!("invalid player update state {}", other)),
        }
    }
}

impl From<UpdateState> for u8 {
    fn from(state: UpdateState) -> Self {
        state as u8
    }
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issued => f.write_str("ISSUED"),
            Self::Checked => f.write_str("CHECKED"),
            Self::Cheat => f.write_str("CHEAT"),
        }
    }
}

/// An issued player update held on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    key: RecordKey,
    current_state: Option<UpdateState>,
    issuer: String,
    update: String,
    update_number: String,
    issue_date_time: String,
}

impl PlayerUpdate {
    /// Build a player update with no state set.
    pub fn create_instance(
        issuer: impl Into<String>,
        update: impl Into<String>,
        update_number: impl Into<String>,
        issue_date_time: impl Into<String>,
    ) -> Result<Self> {
        let issuer = issuer.into();
        let update_number = update_number.into();
        Ok(Self {
            key: Self::make_key(&issuer, &update_number)?,
            current_state: None,
            issuer,
            update: update.into(),
            update_number,
            issue_date_time: issue_date_time.into(),
        })
    }

    /// Key of `issuer`'s update number `update_number`.
    pub fn make_key(issuer: &str, update_number: &str) -> Result<RecordKey> {
        RecordKey::new([issuer, update_number])
    }

    /// Issuer identity.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Published update value.
    pub fn update(&self) -> &str {
        &self.update
    }

    /// Sequence number of this update for its issuer.
    pub fn update_number(&self) -> &str {
        &self.update_number
    }

    /// Issue timestamp as supplied by the caller.
    pub fn issue_date_time(&self) -> &str {
        &self.issue_date_time
    }

    /// Current state, if the contract has set one.
    pub fn current_state(&self) -> Option<UpdateState> {
        self.current_state
    }

    /// Mark as issued.
    pub fn set_issued(&mut self) {
        self.current_state = Some(UpdateState::Issued);
    }

    /// Mark as checked.
    pub fn set_checked(&mut self) {
        self.current_state = Some(UpdateState::Checked);
    }

    /// Mark as cheat.
    pub fn set_cheat(&mut self) {
        self.current_state = Some(UpdateState::Cheat);
    }

    /// Whether the update is ISSUED.
    pub fn is_issued(&self) -> bool {
        self.current_state == Some(UpdateState::Issued)
    }

    /// Whether the update is CHECKED.
    pub fn is_checked(&self) -> bool {
        self.current_state == Some(UpdateState::Checked)
    }

    /// Whether the update is CHEAT.
    pub fn is_cheat(&self) -> bool {
        self.current_state == Some(UpdateState::Cheat)
    }

    /// State for error messages.
    pub(crate) fn state_label(&self) -> String {
        self.current_state
            .map(|s| s.to_string())
            .unwrap_or_else(|| "UNSET".into())
    }
}

impl VersionedRecord for PlayerUpdate {
    const TYPE_TAG: &'static str = "org.gamenet.playerupdate";

    fn key(&self) -> &RecordKey {
        &self.key
    }

    fn key_from_fields(&self) -> Result<RecordKey> {
        Self::make_key(&self.issuer, &self.update_number)
    }

    fn into_variant(self) -> LedgerRecord {
        LedgerRecord::PlayerUpdate(self)
    }

    fn from_variant(record: LedgerRecord) -> std::result::Result<Self, LedgerRecord> {
        match record {
            LedgerRecord::PlayerUpdate(u) => Ok(u),
            other => Err(other),
        }
    }
}
