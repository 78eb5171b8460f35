#![allow(dead_code)]

use farm_engine::{EngineConfig, StakeRebase, StakingEngine};
use farm_nullables::{NullClock, NullRewardLedger, NullStakeLedger};
use farm_token::{RewardLedger, StakeLedger};
use farm_types::AccountId;
use std::sync::Arc;

pub const DAY: u64 = 86_400;
pub const GENESIS: u64 = 1_714_800_000;

pub type TestEngine = StakingEngine<Arc<NullStakeLedger>, Arc<NullRewardLedger>, Arc<NullClock>>;

pub struct Farm {
    pub engine: TestEngine,
    pub stake: Arc<NullStakeLedger>,
    pub reward: Arc<NullRewardLedger>,
    pub clock: Arc<NullClock>,
}

pub fn acct(name: &str) -> AccountId {
    AccountId::new(name)
}

pub fn farm_account() -> AccountId {
    acct("farm")
}

pub fn deployer() -> AccountId {
    acct("deployer")
}

/// A farm with a 1,000,000-unit reward token still owned by the deployer.
pub fn deploy(rebase: StakeRebase) -> Farm {
    let stake = Arc::new(NullStakeLedger::new());
    let reward = Arc::new(NullRewardLedger::new(deployer(), 1_000_000));
    let clock = Arc::new(NullClock::new(GENESIS));
    let engine = StakingEngine::new(
        EngineConfig::new(farm_account()).with_stake_rebase(rebase),
        Arc::clone(&stake),
        Arc::clone(&reward),
        Arc::clone(&clock),
    );
    Farm {
        engine,
        stake,
        reward,
        clock,
    }
}

impl Farm {
    pub fn hand_over_mint_authority(&self) {
        self.reward
            .transfer_ownership(&deployer(), &farm_account())
            .unwrap();
    }

    /// Fund `who` and approve the farm for exactly `amount`.
    pub fn fund(&self, who: &AccountId, amount: u128) {
        self.stake.fund(who, amount);
        let current = self.stake.allowance(who, &farm_account());
        self.stake
            .approve(who, &farm_account(), current + amount)
            .unwrap();
    }

    pub fn custody(&self) -> u128 {
        self.stake.balance_of(&farm_account())
    }
}
