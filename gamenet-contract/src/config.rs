//! Contract Configuration
//!
//! Names under which the contract and its collections live on the ledger.

use crate::core::key::{KEY_DELIMITER, COMPOSITE_SEPARATOR};
use crate::error::{ContractError, Result};

/// Default contract name.
pub const DEFAULT_CONTRACT_NAME: &str = "org.gamenet.game";

/// Default namespace of the commitment collection.
pub const DEFAULT_COMMITMENT_LIST: &str = "org.gamenet.commitmentlist";

/// Default namespace of the player update collection.
pub const DEFAULT_UPDATE_LIST: &str = "org.gamenet.updatelist";

/// Contract configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractConfig {
    /// Contract name reported by the transaction surface.
    pub contract_name: String,
    /// Namespace for commitments.
    pub commitment_list: String,
    /// Namespace for player updates.
    pub update_list: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            contract_name: DEFAULT_CONTRACT_NAME.into(),
            commitment_list: DEFAULT_COMMITMENT_LIST.into(),
            update_list: DEFAULT_UPDATE_LIST.into(),
        }
    }
}

impl ContractConfig {
    /// Create config from environment variables.
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            contract_name: std::env::var("GAMENET_CONTRACT_NAME")
                .unwrap_or(defaults.contract_name),
            commitment_list: std::env::var("GAMENET_COMMITMENT_LIST")
                .unwrap_or(defaults.commitment_list),
            update_list: std::env::var("GAMENET_UPDATE_LIST")
                .unwrap_or(defaults.update_list),
        }
    }

    /// Reject names that would break key derivation or collection isolation.
    pub fn validate(&self) -> Result<()> {
        for (field, name) in [
            ("contract_name", &self.contract_name),
            ("commitment_list", &self.commitment_list),
            ("update_list", &self.update_list),
        ] {
            if name.is_empty() {
                return Err(ContractError::InvalidConfig(format!("{} is empty", field)));
            }
            if name.contains(KEY_DELIMITER) || name.contains(COMPOSITE_SEPARATOR) {
                return Err(ContractError::InvalidConfig(format!(
                    "{} contains a reserved delimiter",
                    field
                )));
            }
        }

        if self.commitment_list == self.update_list {
            return Err(ContractError::InvalidConfig(
                "commitment and update collections share a namespace".into(),
            ));
        }

        Ok(())
    }
}
