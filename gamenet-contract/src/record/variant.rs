//! Record Variants
//!
//! Wire format is one JSON object per record, tagged by `class`:
//!
//! ```text
//! {"class":"org.gamenet.playerupdate","key":"Bob:00002","currentState":1,
//!  "issuer":"Bob","update":"ghfgfg8f","updateNumber":"00002","issueDateTime":"2020-01-28"}
//! ```

use serde::{Serialize, Deserialize};

use crate::core::key::RecordKey;
use crate::error::{ContractError, Result};
use crate::game::commitment::Commitment;
use crate::game::player_update::PlayerUpdate;
use crate::record::VersionedRecord;

/// Every record type the ledger can hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum LedgerRecord {
    /// A committed secret.
    #[serde(rename = "org.gamenet.commitment")]
    Commitment(Commitment),

    /// An issued, checkable player update.
    #[serde(rename = "org.gamenet.playerupdate")]
    PlayerUpdate(PlayerUpdate),
}

impl LedgerRecord {
    /// Type tag of the wrapped record.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Commitment(_) => Commitment::TYPE_TAG,
            Self::PlayerUpdate(_) => PlayerUpdate::TYPE_TAG,
        }
    }

    /// Key of the wrapped record.
    pub fn key(&self) -> &RecordKey {
        match self {
            Self::Commitment(c) => c.key(),
            Self::PlayerUpdate(u) => u.key(),
        }
    }

    /// Encode as JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decode JSON bytes into whichever record type they hold.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let record: Self = serde_json::from_slice(bytes)?;
        record.check_structure()?;
        Ok(record)
    }

    /// Stored key must be the one the fields produce.
    fn check_structure(&self) -> Result<()> {
        let expected = match self {
            Self::Commitment(c) => c.key_from_fields()?,
            Self::PlayerUpdate(u) => u.key_from_fields()?,
        };

        if &expected != self.key() {
            return Err(ContractError::MalformedRecord(format!(
                "{} stored under key {} but fields give {}",
                self.type_tag(),
                self.key(),
                expected
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_tags_match_type_constants() {
        let commitment = Commitment::create_instance("Alice", "s1", "2020-01-20").unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&commitment.to_bytes().unwrap()).unwrap();
        assert_eq!(json["class"], Commitment::TYPE_TAG);

        let update = PlayerUpdate::create_instance("Bob", "h2", "1", "2020-01-28").unwrap();
        let json: serde_json::Value =
            serde_json::from_slice(&update.to_bytes().unwrap()).unwrap();
        assert_eq!(json["class"], PlayerUpdate::TYPE_TAG);
    }

    #[test]
    fn test_dispatch_on_class() {
        let update = PlayerUpdate::create_instance("Bob", "h2", "1", "2020-01-28").unwrap();
        let bytes = update.to_bytes().unwrap();

        match LedgerRecord::from_bytes(&bytes).unwrap() {
            LedgerRecord::PlayerUpdate(decoded) => assert_eq!(decoded, update),
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_rejected() {
        let update = PlayerUpdate::create_instance("Bob", "h2", "1", "2020-01-28").unwrap();
        let bytes = update.to_bytes().unwrap();

        let err = Commitment::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn test_unknown_class_rejected() {
        let bytes = br#"{"class":"org.gamenet.paper","key":"Alice","currentState":null}"#;
        assert!(matches!(
            LedgerRecord::from_bytes(bytes),
            Err(ContractError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(LedgerRecord::from_bytes(b"not json").is_err());
        assert!(LedgerRecord::from_bytes(b"").is_err());
        assert!(LedgerRecord::from_bytes(b"{}").is_err());
    }

    #[test]
    fn test_key_field_mismatch_rejected() {
        let bytes = br#"{"class":"org.gamenet.commitment","key":"Mallory","currentState":2,
            "committer":"Alice","randomString":"s1","commitDateTime":"2020-01-20"}"#;
        let err = LedgerRecord::from_bytes(bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[test]
    fn test_state_out_of_range_rejected() {
        let bytes = br#"{"class":"org.gamenet.playerupdate","key":"Bob:1","currentState":7,
            "issuer":"Bob","update":"h2","updateNumber":"1","issueDateTime":"t"}"#;
        assert!(LedgerRecord::from_bytes(bytes).is_err());
    }
}
