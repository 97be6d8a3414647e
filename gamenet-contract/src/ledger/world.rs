//! Versioned World State
//!
//! Committed key/value pairs, each stamped with the sequence number of the
//! transaction that last wrote it. Transactions run against a
//! [`TxSimulator`], which records what was read (and at which version) and
//! buffers what was written. [`WorldState::apply`] accepts the resulting
//! [`ReadWriteSet`] only if none of the reads went stale.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::core::hash::{LedgerHasher, StateHash};
use crate::core::key::printable;
use crate::error::{ContractError, Result};
use crate::ledger::LedgerStub;

/// A committed value and the sequence number that wrote it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionedValue {
    /// Stored bytes.
    pub value: Vec<u8>,
    /// Commit sequence number of the last write.
    pub version: u64,
}

/// Reads and writes of one simulated transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadWriteSet {
    /// Version observed for each key read (`None` = absent).
    pub reads: BTreeMap<String, Option<u64>>,
    /// Buffered writes.
    pub writes: BTreeMap<String, Vec<u8>>,
}

impl ReadWriteSet {
    /// True if the transaction wrote nothing.
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Committed ledger state.
#[derive(Clone, Debug, Default)]
pub struct WorldState {
    entries: BTreeMap<String, VersionedValue>,
    sequence: u64,
}

impl WorldState {
    /// Create an empty world state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed bytes under `key`.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(|v| v.value.as_slice())
    }

    /// Version of the value under `key`.
    pub fn version_of(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|v| v.version)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sequence number of the last committed write set.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Start simulating a transaction against this state.
    pub fn simulator(&self) -> TxSimulator<'_> {
        TxSimulator::new(self)
    }

    /// Fingerprint of all committed keys and values.
    ///
    /// Versions are excluded: two ledgers holding the same bytes hash equal.
    pub fn state_hash(&self) -> StateHash {
        let mut hasher = LedgerHasher::for_world_state();
        hasher.update_u64(self.entries.len() as u64);
        for (key, entry) in &self.entries {
            hasher.update_entry(key, &entry.value);
        }
        hasher.finalize()
    }

    /// Check every read against the current versions.
    pub fn validate(&self, rwset: &ReadWriteSet) -> Result<()> {
        for (key, observed) in &rwset.reads {
            if self.version_of(key) != *observed {
                warn!("MVCC conflict on {}", printable(key));
                return Err(ContractError::StoreConflict { key: printable(key) });
            }
        }
        Ok(())
    }

    /// Validate and apply a write set atomically.
    ///
    /// Returns the sequence number stamped on the writes. On conflict
    /// nothing is written.
    pub fn apply(&mut self, rwset: ReadWriteSet) -> Result<u64> {
        self.validate(&rwset)?;

        if rwset.is_read_only() {
            return Ok(self.sequence);
        }

        self.sequence += 1;
        let version = self.sequence;
        for (key, value) in rwset.writes {
            debug!("apply {} @ {}", printable(&key), version);
            self.entries.insert(key, VersionedValue { value, version });
        }

        Ok(version)
    }
}

/// Transaction-scoped view of a [`WorldState`].
///
/// Reads see the transaction's own buffered writes first, then committed
/// state. Only reads that reach committed state are recorded.
pub struct TxSimulator<'a> {
    world: &'a WorldState,
    rwset: ReadWriteSet,
}

impl<'a> TxSimulator<'a> {
    /// Create a simulator over committed state.
    pub fn new(world: &'a WorldState) -> Self {
        Self {
            world,
            rwset: ReadWriteSet::default(),
        }
    }

    /// Finish simulation and hand over the read/write set.
    pub fn into_rwset(self) -> ReadWriteSet {
        self.rwset
    }
}

impl LedgerStub for TxSimulator<'_> {
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(pending) = self.rwset.writes.get(key) {
            return Ok(Some(pending.clone()));
        }

        self.rwset
            .reads
            .entry(key.to_string())
            .or_insert_with(|| self.world.version_of(key));

        Ok(self.world.get(key).map(<[u8]>::to_vec))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.rwset.writes.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_one(world: &mut WorldState, key: &str, value: &[u8]) -> u64 {
        let mut sim = world.simulator();
        sim.put_state(key, value.to_vec()).unwrap();
        let rwset = sim.into_rwset();
        world.apply(rwset).unwrap()
    }

    #[test]
    fn test_simulator_buffers_writes() {
        let world = WorldState::new();
        let mut sim = world.simulator();

        sim.put_state("k", b"v".to_vec()).unwrap();
        assert_eq!(sim.get_state("k").unwrap(), Some(b"v".to_vec()));
        assert!(world.get("k").is_none());

        let rwset = sim.into_rwset();
        assert!(rwset.reads.is_empty());
        assert_eq!(rwset.writes.len(), 1);
    }

    #[test]
    fn test_read_after_write_sees_pending_value() {
        let mut world = WorldState::new();
        commit_one(&mut world, "k", b"committed");

        let mut sim = world.simulator();
        sim.put_state("k", b"pending".to_vec()).unwrap();
        assert_eq!(sim.get_state("k").unwrap(), Some(b"pending".to_vec()));
        assert_eq!(sim.get_state("other").unwrap(), None);

        // Only the read that reached committed state is in the read set.
        let rwset = sim.into_rwset();
        assert_eq!(rwset.reads.len(), 1);
        assert_eq!(rwset.reads.get("other"), Some(&None));
        assert!(!rwset.reads.contains_key("k"));
        assert_eq!(rwset.writes.get("k"), Some(&b"pending".to_vec()));

        world.apply(rwset).unwrap();
        assert_eq!(world.get("k"), Some(&b"pending"[..]));
    }

    #[test]
    fn test_apply_stamps_versions() {
        let mut world = WorldState::new();

        assert_eq!(commit_one(&mut world, "a", b"1"), 1);
        assert_eq!(commit_one(&mut world, "a", b"2"), 2);
        assert_eq!(world.get("a"), Some(&b"2"[..]));
        assert_eq!(world.version_of("a"), Some(2));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_stale_read_rejected() {
        let mut world = WorldState::new();
        commit_one(&mut world, "a", b"1");

        let stale = {
            let mut sim = world.simulator();
            sim.get_state("a").unwrap();
            sim.put_state("a", b"stale".to_vec()).unwrap();
            sim.into_rwset()
        };

        commit_one(&mut world, "a", b"2");
        let before = world.state_hash();

        let result = world.apply(stale);
        assert!(matches!(result, Err(ContractError::StoreConflict { .. })));
        assert_eq!(world.state_hash(), before);
        assert_eq!(world.get("a"), Some(&b"2"[..]));
    }

    #[test]
    fn test_absent_read_conflicts_with_insert() {
        let mut world = WorldState::new();

        let first = {
            let mut sim = world.simulator();
            assert!(!sim.state_exists("k").unwrap());
            sim.put_state("k", b"first".to_vec()).unwrap();
            sim.into_rwset()
        };
        let second = {
            let mut sim = world.simulator();
            assert!(!sim.state_exists("k").unwrap());
            sim.put_state("k", b"second".to_vec()).unwrap();
            sim.into_rwset()
        };

        world.apply(first).unwrap();
        assert!(world.apply(second).is_err());
        assert_eq!(world.get("k"), Some(&b"first"[..]));
    }

    #[test]
    fn test_read_only_keeps_sequence() {
        let mut world = WorldState::new();
        commit_one(&mut world, "a", b"1");

        let mut sim = world.simulator();
        sim.get_state("a").unwrap();
        let rwset = sim.into_rwset();

        assert_eq!(world.apply(rwset).unwrap(), 1);
        assert_eq!(world.sequence(), 1);
    }

    #[test]
    fn test_state_hash_ignores_versions() {
        let mut a = WorldState::new();
        commit_one(&mut a, "k", b"x");
        commit_one(&mut a, "k", b"v");

        let mut b = WorldState::new();
        commit_one(&mut b, "k", b"v");

        assert_eq!(a.state_hash(), b.state_hash());
        assert_ne!(a.state_hash(), WorldState::new().state_hash());
    }
}
