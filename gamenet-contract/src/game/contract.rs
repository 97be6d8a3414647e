//! Game Contract
//!
//! Transaction handlers for the anti-cheat protocol:
//!
//! - `commit` / `queryAlpha` - players commit secrets, then derive a shared
//!   value from both once they are open
//! - `issue` / `check` - a player publishes an update value, the opponent
//!   checks it against the revealed proof and the update ends CHECKED or CHEAT
//!
//! Each invocation gets a fresh [`GameContext`] over the transaction's stub.
//! A handler that fails leaves its buffered writes uncommitted.

use tracing::{info, warn, instrument};

use crate::config::ContractConfig;
use crate::error::{ContractError, Result};
use crate::game::commitment::Commitment;
use crate::game::player_update::PlayerUpdate;
use crate::ledger::{Chaincode, LedgerStub};
use crate::record::{RecordCollection, VersionedRecord};

/// Per-transaction context.
pub struct GameContext<'a> {
    stub: &'a mut dyn LedgerStub,
    /// All commitments.
    pub commitment_list: RecordCollection<Commitment>,
    /// All player updates.
    pub update_list: RecordCollection<PlayerUpdate>,
}

impl<'a> GameContext<'a> {
    /// Bind the collections named in `config` to `stub`.
    pub fn new(stub: &'a mut dyn LedgerStub, config: &ContractConfig) -> Self {
        Self {
            stub,
            commitment_list: RecordCollection::new(config.commitment_list.as_str()),
            update_list: RecordCollection::new(config.update_list.as_str()),
        }
    }

    /// Commitment of `committer`.
    pub fn get_commitment(&mut self, committer: &str) -> Result<Commitment> {
        let key = Commitment::make_key(committer)?;
        self.commitment_list.get(&mut *self.stub, &key)
    }

    /// Update `update_number` of `issuer`.
    pub fn get_update(&mut self, issuer: &str, update_number: &str) -> Result<PlayerUpdate> {
        let key = PlayerUpdate::make_key(issuer, update_number)?;
        self.update_list.get(&mut *self.stub, &key)
    }

    fn add_commitment(&mut self, commitment: &Commitment) -> Result<()> {
        self.commitment_list.add(&mut *self.stub, commitment)
    }

    fn add_update(&mut self, update: &PlayerUpdate) -> Result<()> {
        self.update_list.add(&mut *self.stub, update)
    }

    fn update_update(&mut self, update: &PlayerUpdate) -> Result<()> {
        self.update_list.update(&mut *self.stub, update)
    }
}

/// The anti-cheat contract.
#[derive(Clone, Debug, Default)]
pub struct GameContract {
    config: ContractConfig,
}

impl GameContract {
    /// Create a contract; the config must validate.
    pub fn new(config: ContractConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Contract name.
    pub fn name(&self) -> &str {
        &self.config.contract_name
    }

    /// Contract configuration.
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Fresh context for one transaction.
    pub fn create_context<'a>(&self, stub: &'a mut dyn LedgerStub) -> GameContext<'a> {
        GameContext::new(stub, &self.config)
    }

    /// Ledger setup hook. Nothing to migrate.
    pub fn instantiate(&self, _ctx: &mut GameContext<'_>) -> Result<()> {
        info!("Instantiate contract {}", self.name());
        Ok(())
    }

    /// Record a new commitment for `committer`, already OPENED.
    #[instrument(skip(self, ctx, random_string))]
    pub fn commit(
        &self,
        ctx: &mut GameContext<'_>,
        committer: &str,
        random_string: &str,
        commit_date_time: &str,
    ) -> Result<Commitment> {
        let mut commitment = Commitment::create_instance(committer, random_string, commit_date_time)?;

        // The contract, not the record, decides the state.
        commitment.set_opened();

        ctx.add_commitment(&commitment)?;
        info!("{} committed", committer);
        Ok(commitment)
    }

    /// Publish update `update_number` for `issuer`.
    #[instrument(skip(self, ctx))]
    pub fn issue(
        &self,
        ctx: &mut GameContext<'_>,
        issuer: &str,
        update: &str,
        update_number: &str,
        issue_date_time: &str,
    ) -> Result<PlayerUpdate> {
        let mut player_update =
            PlayerUpdate::create_instance(issuer, update, update_number, issue_date_time)?;
        player_update.set_issued();

        ctx.add_update(&player_update)?;
        info!("{} issued update {}", issuer, update_number);
        Ok(player_update)
    }

    /// Check an issued update against the revealed proof.
    ///
    /// The cheat marking runs before the single-use guard. A record that is
    /// no longer ISSUED is rejected with `AlreadyChecked` after that marking,
    /// and the failed transaction persists nothing.
    #[instrument(skip(self, ctx))]
    pub fn check(
        &self,
        ctx: &mut GameContext<'_>,
        issuer: &str,
        update_number: &str,
        proof_update: &str,
    ) -> Result<PlayerUpdate> {
        let mut player_update = ctx.get_update(issuer, update_number)?;
        let was_issued = player_update.is_issued();

        if player_update.update() != proof_update {
            warn!("Update {}:{} was a cheat", issuer, update_number);
            player_update.set_cheat();
        } else if was_issued {
            player_update.set_checked();
        }

        if !was_issued {
            return Err(ContractError::AlreadyChecked {
                issuer: issuer.to_string(),
                update_number: update_number.to_string(),
                state: player_update.state_label(),
            });
        }

        ctx.update_update(&player_update)?;
        info!(
            "Update {}:{} is {}",
            issuer,
            update_number,
            player_update.state_label()
        );
        Ok(player_update)
    }

    /// Concatenate both players' secrets once both commitments are OPENED.
    #[instrument(skip(self, ctx))]
    pub fn query_alpha(
        &self,
        ctx: &mut GameContext<'_>,
        player1: &str,
        player2: &str,
    ) -> Result<String> {
        let commitment1 = ctx.get_commitment(player1)?;
        let commitment2 = ctx.get_commitment(player2)?;

        if !(commitment1.is_opened() && commitment2.is_opened()) {
            return Err(ContractError::CommitmentNotOpened {
                player1: player1.to_string(),
                player2: player2.to_string(),
            });
        }

        let mut alpha = String::with_capacity(
            commitment1.random_string().len() + commitment2.random_string().len(),
        );
        alpha.push_str(commitment1.random_string());
        alpha.push_str(commitment2.random_string());
        Ok(alpha)
    }

    /// Dispatch a named transaction with string positional arguments.
    pub fn invoke_function(
        &self,
        ctx: &mut GameContext<'_>,
        function: &str,
        args: &[&str],
    ) -> Result<Vec<u8>> {
        match function {
            "instantiate" => {
                let [] = positional::<0>(function, args)?;
                self.instantiate(ctx)?;
                Ok(Vec::new())
            }
            "commit" => {
                let [committer, random_string, commit_date_time] = positional(function, args)?;
                self.commit(ctx, committer, random_string, commit_date_time)?.to_bytes()
            }
            "issue" => {
                let [issuer, update, update_number, issue_date_time] = positional(function, args)?;
                self.issue(ctx, issuer, update, update_number, issue_date_time)?.to_bytes()
            }
            "check" => {
                let [issuer, update_number, proof_update] = positional(function, args)?;
                self.check(ctx, issuer, update_number, proof_update)?.to_bytes()
            }
            "queryAlpha" => {
                let [player1, player2] = positional(function, args)?;
                Ok(self.query_alpha(ctx, player1, player2)?.into_bytes())
            }
            other => Err(ContractError::UnknownFunction(other.to_string())),
        }
    }
}

impl Chaincode for GameContract {
    fn invoke(&self, stub: &mut dyn LedgerStub, function: &str, args: &[&str]) -> Result<Vec<u8>> {
        let mut ctx = self.create_context(stub);
        self.invoke_function(&mut ctx, function, args)
    }
}

/// Exactly `N` positional arguments.
fn positional<'s, const N: usize>(function: &str, args: &[&'s str]) -> Result<[&'s str; N]> {
    <[&'s str; N]>::try_from(args).map_err(|_| ContractError::ArgumentCount {
        function: function.to_string(),
        expected: N,
        got: args.len(),
    })
}
