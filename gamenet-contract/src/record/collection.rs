//! Record Collections
//!
//! A namespaced, single-type view over the ledger. The collection holds no
//! data and no store; each call borrows the transaction's stub.
//!
//! The store reference lives one level up, in [`GameContext`], which owns
//! both collections alongside the stub and lends it to every call. Two
//! collections can then share one `&mut` stub within a transaction.
//!
//! [`GameContext`]: crate::game::GameContext

use std::marker::PhantomData;
use tracing::debug;

use crate::core::key::{composite_key, printable, RecordKey};
use crate::error::{ContractError, Result};
use crate::ledger::LedgerStub;
use crate::record::VersionedRecord;

/// Keyed collection of records of type `T`.
#[derive(Debug)]
pub struct RecordCollection<T: VersionedRecord> {
    namespace: String,
    _record: PhantomData<fn() -> T>,
}

impl<T: VersionedRecord> RecordCollection<T> {
    /// Create a collection under `namespace`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            _record: PhantomData,
        }
    }

    /// Collection namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Ledger key for a record key.
    pub fn ledger_key(&self, key: &RecordKey) -> String {
        composite_key(&self.namespace, &key.derive(T::TYPE_TAG))
    }

    /// Insert a new record. Fails if the key is taken.
    pub fn add<S>(&self, stub: &mut S, record: &T) -> Result<()>
    where
        S: LedgerStub + ?Sized,
    {
        let ledger_key = self.ledger_key(record.key());
        if stub.state_exists(&ledger_key)? {
            return Err(ContractError::DuplicateKey { key: record.derive_key() });
        }

        debug!("add {}", printable(&ledger_key));
        stub.put_state(&ledger_key, record.to_bytes()?)
    }

    /// Read the record stored under `key`.
    pub fn get<S>(&self, stub: &mut S, key: &RecordKey) -> Result<T>
    where
        S: LedgerStub + ?Sized,
    {
        let ledger_key = self.ledger_key(key);
        let bytes = stub
            .get_state(&ledger_key)?
            .ok_or_else(|| ContractError::NotFound { key: key.derive(T::TYPE_TAG) })?;

        debug!("get {} ({} bytes)", printable(&ledger_key), bytes.len());
        let record = T::from_bytes(&bytes)?;
        if record.key() != key {
            return Err(ContractError::MalformedRecord(format!(
                "{} holds a record keyed {}",
                printable(&ledger_key),
                record.key()
            )));
        }
        Ok(record)
    }

    /// Overwrite an existing record. Fails if the key is absent.
    pub fn update<S>(&self, stub: &mut S, record: &T) -> Result<()>
    where
        S: LedgerStub + ?Sized,
    {
        let ledger_key = self.ledger_key(record.key());
        if !stub.state_exists(&ledger_key)? {
            return Err(ContractError::NotFound { key: record.derive_key() });
        }

        debug!("update {}", printable(&ledger_key));
        stub.put_state(&ledger_key, record.to_bytes()?)
    }
}
