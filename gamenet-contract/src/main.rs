//! GameNet Contract Demo
//!
//! Runs the commit / issue / check flows of two players against an
//! in-memory ledger peer and reports what the contract decided.

use anyhow::Context;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use gamenet::{
    VERSION, ContractConfig, GameContract, LedgerPeer, VersionedRecord,
    game::{Commitment, PlayerUpdate},
    core::hash::update_digest,
    error::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ContractConfig::from_env();
    let contract = GameContract::new(config).context("invalid contract configuration")?;

    info!("GameNet Contract v{}", VERSION);
    info!("Contract: {}", contract.name());

    let peer = LedgerPeer::new(contract);
    demo(&peer).await?;

    info!("=== Ledger ===");
    info!("World State Hash: {}", hex::encode(peer.state_hash().await));
    for record in peer.transaction_log().await {
        info!(
            "{} {} {:?} at {}",
            record.tx_id,
            record.function,
            record.outcome,
            record.committed_at.to_rfc3339()
        );
    }
    let log = serde_json::to_string(&peer.transaction_log().await)?;
    debug!("Transaction log: {}", log);

    Ok(())
}

/// Alice and Bob commit, Bob issues an update, Alice checks it with a
/// different proof.
async fn demo(peer: &LedgerPeer<GameContract>) -> anyhow::Result<()> {
    peer.submit_transaction("instantiate", &[]).await?;

    info!("=== Commit ===");
    for (player, secret, date) in [("Alice", "f14dws35f", "2020-01-20"), ("Bob", "gh4dws87f", "2020-01-20")] {
        let response = peer.submit_transaction("commit", &[player, secret, date]).await?;
        let commitment = Commitment::from_bytes(&response)?;
        info!(
            "{} commit: successfully issued for value {}",
            commitment.committer(),
            commitment.random_string()
        );
    }

    let alpha = peer.evaluate_transaction("queryAlpha", &["Alice", "Bob"]).await?;
    info!("Alpha: {}", String::from_utf8_lossy(&alpha));

    info!("=== Issue ===");
    let honest = update_digest(b"Bob moves 3 north");
    let response = peer
        .submit_transaction("issue", &["Bob", honest.as_str(), "00002", "2020-01-28"])
        .await?;
    let update = PlayerUpdate::from_bytes(&response)?;
    info!(
        "{} player update: {} successfully issued for value {}",
        update.issuer(),
        update.update_number(),
        update.update()
    );

    info!("=== Check ===");
    let revealed = update_digest(b"Bob moves 5 north");
    let response = peer
        .submit_transaction("check", &["Bob", "00002", revealed.as_str()])
        .await?;
    let update = PlayerUpdate::from_bytes(&response)?;
    if update.is_cheat() {
        warn!(
            "Check of {} player update with number {}: this is a cheat!",
            update.issuer(),
            update.update_number()
        );
    } else {
        info!("{} player update {} checked", update.issuer(), update.update_number());
    }

    match peer.submit_transaction("check", &["Bob", "00002", honest.as_str()]).await {
        Err(err) if err.kind() == ErrorKind::AlreadyChecked => {
            info!("Repeated check rejected: {}", err);
        }
        Err(err) => return Err(err.into()),
        Ok(_) => warn!("Repeated check unexpectedly accepted"),
    }

    Ok(())
}
