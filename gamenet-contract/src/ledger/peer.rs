//! Ledger Peer
//!
//! Runs chaincode in two phases:
//!
//! 1. **Endorse** - simulate the handler under a read lock, capture its
//!    read/write set and result payload.
//! 2. **Commit** - under the write lock, check the reads are still current
//!    and apply the writes in one step.
//!
//! Between the phases other transactions may commit. A transaction whose
//! reads went stale fails with `StoreConflict` and writes nothing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn, instrument};
use uuid::Uuid;

use crate::core::hash::StateHash;
use crate::error::Result;
use crate::ledger::{LedgerStub, ReadWriteSet, WorldState};

/// Contract code callable by the peer.
pub trait Chaincode: Send + Sync {
    /// Run `function` with positional string arguments.
    fn invoke(&self, stub: &mut dyn LedgerStub, function: &str, args: &[&str]) -> Result<Vec<u8>>;
}

/// A simulated transaction waiting to be committed.
#[derive(Clone, Debug)]
pub struct Endorsement {
    /// Transaction identifier.
    pub tx_id: Uuid,
    /// Invoked function.
    pub function: String,
    /// Reads and writes captured during simulation.
    pub rwset: ReadWriteSet,
    /// Handler result.
    pub payload: Vec<u8>,
}

/// Validation outcome of a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxOutcome {
    /// Writes applied.
    Valid,
    /// Rejected because a read went stale.
    MvccConflict,
}

/// Entry in the peer's transaction log.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRecord {
    /// Transaction identifier.
    pub tx_id: Uuid,
    /// Invoked function.
    pub function: String,
    /// When validation finished.
    pub committed_at: DateTime<Utc>,
    /// Validation outcome.
    pub outcome: TxOutcome,
}

/// In-memory peer hosting one chaincode.
pub struct LedgerPeer<C: Chaincode> {
    chaincode: C,
    world: RwLock<WorldState>,
    log: RwLock<Vec<TxRecord>>,
}

impl<C: Chaincode> LedgerPeer<C> {
    /// Create a peer with an empty ledger.
    pub fn new(chaincode: C) -> Self {
        Self::with_state(chaincode, WorldState::new())
    }

    /// Create a peer over existing state.
    pub fn with_state(chaincode: C, world: WorldState) -> Self {
        Self {
            chaincode,
            world: RwLock::new(world),
            log: RwLock::new(Vec::new()),
        }
    }

    /// Simulate a transaction without committing it.
    #[instrument(skip(self, args))]
    pub async fn endorse(&self, function: &str, args: &[&str]) -> Result<Endorsement> {
        let world = self.world.read().await;
        let mut simulator = world.simulator();
        let payload = self.chaincode.invoke(&mut simulator, function, args)?;

        Ok(Endorsement {
            tx_id: Uuid::new_v4(),
            function: function.to_string(),
            rwset: simulator.into_rwset(),
            payload,
        })
    }

    /// Validate and apply an endorsed transaction.
    #[instrument(skip(self, endorsement), fields(tx_id = %endorsement.tx_id))]
    pub async fn commit(&self, endorsement: Endorsement) -> Result<Vec<u8>> {
        let Endorsement { tx_id, function, rwset, payload } = endorsement;

        let applied = {
            let mut world = self.world.write().await;
            world.apply(rwset)
        };

        let outcome = match &applied {
            Ok(sequence) => {
                info!("{} committed at sequence {}", function, sequence);
                TxOutcome::Valid
            }
            Err(err) => {
                warn!("{} rejected: {}", function, err);
                TxOutcome::MvccConflict
            }
        };

        self.log.write().await.push(TxRecord {
            tx_id,
            function,
            committed_at: Utc::now(),
            outcome,
        });

        applied.map(|_| payload)
    }

    /// Endorse and commit in one call.
    pub async fn submit_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>> {
        let endorsement = self.endorse(function, args).await?;
        self.commit(endorsement).await
    }

    /// Run a query; writes are discarded.
    pub async fn evaluate_transaction(&self, function: &str, args: &[&str]) -> Result<Vec<u8>> {
        let endorsement = self.endorse(function, args).await?;
        Ok(endorsement.payload)
    }

    /// Committed bytes under a ledger key.
    pub async fn get_state(&self, key: &str) -> Option<Vec<u8>> {
        let world = self.world.read().await;
        world.get(key).map(<[u8]>::to_vec)
    }

    /// Fingerprint of the committed state.
    pub async fn state_hash(&self) -> StateHash {
        self.world.read().await.state_hash()
    }

    /// Submitted transactions in commit order.
    pub async fn transaction_log(&self) -> Vec<TxRecord> {
        self.log.read().await.clone()
    }

    /// The hosted chaincode.
    pub fn chaincode(&self) -> &C {
        &self.chaincode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContractError;

    /// Counter chaincode: `incr <key>` reads a decimal value and writes it back plus one.
    struct Counter;

    impl Chaincode for Counter {
        fn invoke(&self, stub: &mut dyn LedgerStub, function: &str, args: &[&str]) -> Result<Vec<u8>> {
            match function {
                "incr" => {
                    let key = args[0];
                    let current = stub
                        .get_state(key)?
                        .map(|b| String::from_utf8_lossy(&b).parse::<u64>().unwrap_or(0))
                        .unwrap_or(0);
                    let next = (current + 1).to_string().into_bytes();
                    stub.put_state(key, next.clone())?;
                    Ok(next)
                }
                other => Err(ContractError::UnknownFunction(other.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_submit_applies_writes() {
        let peer = LedgerPeer::new(Counter);

        assert_eq!(peer.submit_transaction("incr", &["c"]).await.unwrap(), b"1");
        assert_eq!(peer.submit_transaction("incr", &["c"]).await.unwrap(), b"2");
        assert_eq!(peer.get_state("c").await, Some(b"2".to_vec()));

        let log = peer.transaction_log().await;
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|r| r.outcome == TxOutcome::Valid));
    }

    #[tokio::test]
    async fn test_log_exports_as_json() {
        let peer = LedgerPeer::new(Counter);
        peer.submit_transaction("incr", &["c"]).await.unwrap();

        let log = peer.transaction_log().await;
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json[0]["txId"], log[0].tx_id.to_string());
        assert_eq!(json[0]["function"], "incr");
        assert_eq!(json[0]["outcome"], "valid");
        assert!(json[0]["committedAt"].is_string());
    }

    #[tokio::test]
    async fn test_evaluate_never_writes() {
        let peer = LedgerPeer::new(Counter);
        let before = peer.state_hash().await;

        assert_eq!(peer.evaluate_transaction("incr", &["c"]).await.unwrap(), b"1");
        assert_eq!(peer.get_state("c").await, None);
        assert_eq!(peer.state_hash().await, before);
        assert!(peer.transaction_log().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_endorsements_conflict() {
        let peer = LedgerPeer::new(Counter);

        let first = peer.endorse("incr", &["c"]).await.unwrap();
        let second = peer.endorse("incr", &["c"]).await.unwrap();

        assert!(peer.commit(first).await.is_ok());
        let result = peer.commit(second).await;
        assert!(matches!(result, Err(ContractError::StoreConflict { .. })));
        assert_eq!(peer.get_state("c").await, Some(b"1".to_vec()));

        let outcomes: Vec<TxOutcome> = peer
            .transaction_log()
            .await
            .into_iter()
            .map(|r| r.outcome)
            .collect();
        assert_eq!(outcomes, vec![TxOutcome::Valid, TxOutcome::MvccConflict]);
    }

    #[tokio::test]
    async fn test_failed_handler_leaves_no_trace() {
        let peer = LedgerPeer::new(Counter);
        let result = peer.submit_transaction("nope", &[]).await;

        assert!(matches!(result, Err(ContractError::UnknownFunction(_))));
        assert!(peer.transaction_log().await.is_empty());
    }

    #[tokio::test]
    async fn test_disjoint_keys_commit_independently() {
        let peer = LedgerPeer::new(Counter);

        let a = peer.endorse("incr", &["a"]).await.unwrap();
        let b = peer.endorse("incr", &["b"]).await.unwrap();

        assert!(peer.commit(b).await.is_ok());
        assert!(peer.commit(a).await.is_ok());
    }
}
