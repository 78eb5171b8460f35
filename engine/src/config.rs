//! Engine runtime configuration.
//!
//! The accrual rate and period are constants, not configuration.

use farm_types::AccountId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What `stake` does with accrual pending on an existing balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeRebase {
    /// Settle pending accrual into `unclaimed_reward` before re-basing, the
    /// same way `unstake` does.
    #[default]
    Settle,
    /// Re-base without settling. Accrual pending on the prior balance at the
    /// moment of a top-up is lost.
    Discard,
}

impl FromStr for StakeRebase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "settle" => Ok(Self::Settle),
            "discard" => Ok(Self::Discard),
            other => Err(format!(
                "unknown stake rebase mode {other:?}, expected \"settle\" or \"discard\""
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The engine's own identity: custody account for deposits and the
    /// principal that must own the reward ledger.
    pub engine_account: AccountId,

    #[serde(default)]
    pub stake_rebase: StakeRebase,
}

impl EngineConfig {
    pub fn new(engine_account: AccountId) -> Self {
        Self {
            engine_account,
            stake_rebase: StakeRebase::default(),
        }
    }

    pub fn with_stake_rebase(mut self, stake_rebase: StakeRebase) -> Self {
        self.stake_rebase = stake_rebase;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebase_mode_parses_case_insensitively() {
        assert_eq!("Settle".parse::<StakeRebase>(), Ok(StakeRebase::Settle));
        assert_eq!("DISCARD".parse::<StakeRebase>(), Ok(StakeRebase::Discard));
        assert!("halfway".parse::<StakeRebase>().is_err());
    }

    #[test]
    fn config_defaults_to_settle() {
        let config = EngineConfig::new(AccountId::new("farm"));
        assert_eq!(config.stake_rebase, StakeRebase::Settle);
        let config = config.with_stake_rebase(StakeRebase::Discard);
        assert_eq!(config.stake_rebase, StakeRebase::Discard);
    }
}
