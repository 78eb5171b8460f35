//! A stake farm loaded from the state file: the engine plus the two token
//! ledgers it holds capabilities on.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use farm_engine::{EngineConfig, StakingEngine};
use farm_token::TokenLedger;
use farm_types::{AccountId, Clock, Timestamp};
use farm_utils::{format_duration, time_to_next_period};

use crate::clock::FarmClock;
use crate::error::CliError;
use crate::state::{FarmState, FileStore};

pub const STAKE_TOKEN_NAME: &str = "MockDai";
pub const STAKE_TOKEN_SYMBOL: &str = "mDAI";
pub const REWARD_TOKEN_NAME: &str = "C2N Token";
pub const REWARD_TOKEN_SYMBOL: &str = "C2N";
pub const DEFAULT_REWARD_SUPPLY: u128 = 1_000_000;

pub type Engine = StakingEngine<Arc<TokenLedger>, Arc<TokenLedger>, FarmClock>;

pub struct Farm {
    pub engine: Engine,
    pub stake_token: Arc<TokenLedger>,
    pub reward_token: Arc<TokenLedger>,
    store: FileStore,
}

/// One account's view of the farm, printed by `status`.
#[derive(Debug, Serialize)]
pub struct AccountStatus {
    pub account: AccountId,
    pub now: Timestamp,
    pub is_staking: bool,
    pub staking_balance: u128,
    pub accrual_start: Timestamp,
    pub accrued_time: u64,
    pub accrued_time_human: String,
    pub next_period_in: u64,
    pub unclaimed_reward: u128,
    pub pending_reward: u128,
    pub stake_token_balance: u128,
    pub stake_token_allowance: u128,
    pub reward_token_balance: u128,
    pub total_staked: u128,
    pub total_minted: u128,
    pub mint_authority_held: bool,
}

impl Farm {
    /// Deploy a fresh farm: an ownerless stake token, a reward token with
    /// `reward_supply` credited to `owner`, and the engine. Ownership of the
    /// reward token is then handed to the engine.
    pub fn deploy(
        path: &Path,
        config: EngineConfig,
        owner: &AccountId,
        reward_supply: u128,
        clock: FarmClock,
    ) -> Result<Self, CliError> {
        let stake_token = Arc::new(TokenLedger::mock(STAKE_TOKEN_NAME, STAKE_TOKEN_SYMBOL));
        let reward_token = Arc::new(
            TokenLedger::with_supply(
                REWARD_TOKEN_NAME,
                REWARD_TOKEN_SYMBOL,
                owner.clone(),
                reward_supply,
            )
            .map_err(|e| CliError::State(e.to_string()))?,
        );
        let engine_account = config.engine_account.clone();
        let engine = StakingEngine::new(
            config,
            Arc::clone(&stake_token),
            Arc::clone(&reward_token),
            clock,
        );

        farm_token::RewardLedger::transfer_ownership(&*reward_token, owner, &engine_account)
            .map_err(|e| CliError::State(e.to_string()))?;
        engine.refresh_mint_authority();
        tracing::info!(
            engine = %engine_account,
            %owner,
            reward_supply,
            "farm deployed, reward token ownership transferred to engine"
        );

        Ok(Self {
            engine,
            stake_token,
            reward_token,
            store: FileStore::create(path, FarmState::default()),
        })
    }

    pub fn load(path: &Path, config: EngineConfig, clock: FarmClock) -> Result<Self, CliError> {
        let store = FileStore::open(path)?;
        let stake_token = Arc::new(TokenLedger::from_state(store.stake_token()));
        let reward_token = Arc::new(TokenLedger::from_state(store.reward_token()));
        let engine = StakingEngine::load_from_store(
            &store,
            config,
            Arc::clone(&stake_token),
            Arc::clone(&reward_token),
            clock,
        )
        .map_err(|e| CliError::State(e.to_string()))?;
        Ok(Self {
            engine,
            stake_token,
            reward_token,
            store,
        })
    }

    /// Persist engine records and both ledgers.
    pub fn save(&self) -> Result<(), CliError> {
        self.engine
            .save_to_store(&self.store)
            .map_err(|e| CliError::State(e.to_string()))?;
        self.store
            .set_tokens(self.stake_token.snapshot(), self.reward_token.snapshot());
        self.store.flush()
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Faucet-mint stake asset to `account`.
    pub fn fund(&self, account: &AccountId, amount: u128) -> Result<u128, CliError> {
        self.stake_token
            .faucet_mint(account, amount)
            .map_err(|e| CliError::State(e.to_string()))?;
        Ok(self.stake_token.balance_of(account))
    }

    /// Set `account`'s allowance for the engine to `amount`.
    pub fn approve(&self, account: &AccountId, amount: u128) -> Result<(), CliError> {
        farm_token::StakeLedger::approve(
            &*self.stake_token,
            account,
            self.engine.engine_account(),
            amount,
        )
        .map_err(|e| CliError::State(e.to_string()))
    }

    pub fn status(&self, account: &AccountId) -> Result<AccountStatus, CliError> {
        let now = self.engine.clock().now();
        let accrued_time = self.engine.calculate_accrued_time(account);
        let pending_reward = self
            .engine
            .pending_reward(account)
            .map_err(|e| CliError::State(e.to_string()))?;
        Ok(AccountStatus {
            account: account.clone(),
            now,
            is_staking: self.engine.is_staking(account),
            staking_balance: self.engine.staking_balance(account),
            accrual_start: self.engine.accrual_start(account),
            accrued_time,
            accrued_time_human: format_duration(accrued_time),
            next_period_in: time_to_next_period(accrued_time),
            unclaimed_reward: self.engine.unclaimed_reward(account),
            pending_reward,
            stake_token_balance: self.stake_token.balance_of(account),
            stake_token_allowance: self
                .stake_token
                .allowance(account, self.engine.engine_account()),
            reward_token_balance: self.reward_token.balance_of(account),
            total_staked: self.engine.total_staked(),
            total_minted: self.engine.total_minted(),
            mint_authority_held: self.engine.mint_authority_held(),
        })
    }
}
