//! Ledger Records
//!
//! Every entity stored on the ledger implements [`VersionedRecord`]:
//! a fixed type tag, an immutable [`RecordKey`], a state marker set only
//! by contract logic, and an exact JSON round trip.
//!
//! The set of record types is closed. [`LedgerRecord`] lists them and
//! decoding dispatches on the `class` tag written into every record, so a
//! byte string read back from the ledger always revives as the type that
//! wrote it (or fails).

pub mod variant;
pub mod collection;

pub use variant::LedgerRecord;
pub use collection::RecordCollection;

use std::fmt::Debug;

use crate::core::key::RecordKey;
use crate::error::{ContractError, Result};

/// Behaviour shared by all ledger record types.
pub trait VersionedRecord: Clone + Debug + PartialEq + Sized {
    /// Type tag written as `class`; also the first component of the derived key.
    const TYPE_TAG: &'static str;

    /// The record's key.
    fn key(&self) -> &RecordKey;

    /// Rebuild the key from the entity fields it is made of.
    ///
    /// Decoding rejects records whose stored key disagrees with this.
    fn key_from_fields(&self) -> Result<RecordKey>;

    /// Wrap into the closed variant set.
    fn into_variant(self) -> LedgerRecord;

    /// Unwrap from the variant set, handing back other variants untouched.
    fn from_variant(record: LedgerRecord) -> std::result::Result<Self, LedgerRecord>;

    /// Type tag plus key parts, `:`-joined.
    fn derive_key(&self) -> String {
        self.key().derive(Self::TYPE_TAG)
    }

    /// Encode for the ledger.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        self.clone().into_variant().to_bytes()
    }

    /// Decode bytes that must hold a record of this type.
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let record = LedgerRecord::from_bytes(bytes)?;
        Self::from_variant(record).map_err(|other| {
            ContractError::MalformedRecord(format!(
                "expected {}, found {}",
                Self::TYPE_TAG,
                other.type_tag()
            ))
        })
    }
}
