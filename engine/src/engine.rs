//! Core staking accrual engine.

use crate::authority::MintAuthority;
use crate::config::{EngineConfig, StakeRebase};
use crate::error::FarmError;
use crate::record::StakingRecord;
use crate::stats::EngineStats;
use crate::table::{AccountTable, Slot};
use farm_store::StakingStore;
use farm_token::{RewardLedger, StakeLedger, TokenError};
use farm_types::{AccountId, Clock, Timestamp};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

const META_TOTAL_MINTED: &[u8] = b"total_minted";
const META_MINT_AUTHORITY: &[u8] = b"mint_authority";

/// Observational aggregates. Never consulted for correctness.
#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    staked: u128,
    minted: u128,
}

/// The staking accrual engine.
///
/// Owns the account table and talks to the two asset ledgers through their
/// capability traits. Every mutating operation:
/// 1. locks the account's slot for its whole duration,
/// 2. computes the next record without touching the table,
/// 3. performs the external ledger call,
/// 4. commits the record only if that call succeeded.
///
/// A failed operation therefore leaves no trace in the table.
pub struct StakingEngine<S, R, C> {
    config: EngineConfig,
    stake_ledger: S,
    reward_ledger: R,
    clock: C,
    accounts: AccountTable,
    authority: MintAuthority,
    totals: Mutex<Totals>,
    stats: EngineStats,
}

impl<S, R, C> StakingEngine<S, R, C>
where
    S: StakeLedger,
    R: RewardLedger,
    C: Clock,
{
    pub fn new(config: EngineConfig, stake_ledger: S, reward_ledger: R, clock: C) -> Self {
        Self {
            config,
            stake_ledger,
            reward_ledger,
            clock,
            accounts: AccountTable::new(),
            authority: MintAuthority::default(),
            totals: Mutex::new(Totals::default()),
            stats: EngineStats::new(),
        }
    }

    /// Deposit `amount` of the stake asset from `account` into engine custody.
    ///
    /// `account` must have approved the engine for at least `amount` on the
    /// stake ledger. Returns the account's new staked balance.
    pub fn stake(&self, account: &AccountId, amount: u128) -> Result<u128, FarmError> {
        if amount == 0 {
            return self.reject("stake", account, FarmError::ZeroAmount);
        }
        if account == self.engine_account() {
            return self.reject("stake", account, FarmError::EngineAccount);
        }
        let slot = self.accounts.slot(account);
        let result = self.stake_in_slot(&slot, account, amount);
        if result.is_err() {
            self.accounts.release(account, &slot);
        }
        result
    }

    fn stake_in_slot(
        &self,
        slot: &Mutex<Slot>,
        account: &AccountId,
        amount: u128,
    ) -> Result<u128, FarmError> {
        let mut guard = AccountTable::acquire(slot);
        let now = self.clock.now();

        let current = guard.clone().unwrap_or_else(|| StakingRecord::new(now));
        let rebased = match self.config.stake_rebase {
            StakeRebase::Settle => current.settled(now),
            StakeRebase::Discard => Ok(current.clone()),
        };
        let next = match rebased.and_then(|r| r.deposited(amount, now)) {
            Ok(next) => next,
            Err(e) => return self.reject("stake", account, e),
        };

        let engine = &self.config.engine_account;
        if let Err(e) = self
            .stake_ledger
            .transfer_from(engine, account, engine, amount)
        {
            return self.external_failure("stake", account, map_transfer_in(e));
        }

        debug!(
            %account,
            settled = next.unclaimed_reward - current.unclaimed_reward,
            "stake re-based accrual clock"
        );
        let staked = next.staked_amount;
        *guard = Some(next);
        drop(guard);

        self.with_totals(|t| t.staked = t.staked.saturating_add(amount));
        self.stats.record_stake();
        info!(%account, amount, staked, "stake committed");
        Ok(staked)
    }

    /// Return `amount` of the stake asset from custody to `account`.
    ///
    /// Accrual on the balance held so far is settled into `unclaimed_reward`
    /// first. Returns the account's new staked balance.
    pub fn unstake(&self, account: &AccountId, amount: u128) -> Result<u128, FarmError> {
        if amount == 0 {
            return self.reject("unstake", account, FarmError::ZeroAmount);
        }
        if account == self.engine_account() {
            return self.reject("unstake", account, FarmError::EngineAccount);
        }
        let no_stake = FarmError::InsufficientStake {
            requested: amount,
            staked: 0,
        };
        let Some(slot) = self.accounts.existing_slot(account) else {
            return self.reject("unstake", account, no_stake);
        };
        let mut guard = AccountTable::acquire(&slot);
        let now = self.clock.now();

        let Some(current) = guard.clone() else {
            return self.reject("unstake", account, no_stake);
        };
        let next = match current.withdrawn(amount, now) {
            Ok(next) => next,
            Err(e) => return self.reject("unstake", account, e),
        };

        if let Err(e) = self
            .stake_ledger
            .transfer(&self.config.engine_account, account, amount)
        {
            return self.external_failure(
                "unstake",
                account,
                FarmError::TransferFailed(e.to_string()),
            );
        }

        debug!(
            %account,
            settled = next.unclaimed_reward - current.unclaimed_reward,
            "unstake settled accrual"
        );
        let staked = next.staked_amount;
        *guard = Some(next);
        drop(guard);

        self.with_totals(|t| t.staked = t.staked.saturating_sub(amount));
        self.stats.record_unstake();
        info!(%account, amount, staked, "unstake committed");
        Ok(staked)
    }

    /// Seconds elapsed since the account's accrual clock was last re-based.
    /// Zero for accounts that never staked.
    pub fn calculate_accrued_time(&self, account: &AccountId) -> u64 {
        let now = self.clock.now();
        self.accounts
            .get(account)
            .map(|r| r.accrued_time(now))
            .unwrap_or(0)
    }

    /// Mint everything owed to `account`: settled `unclaimed_reward` plus
    /// accrual on the current balance. Returns the amount minted, which may
    /// be zero.
    pub fn withdraw_yield(&self, account: &AccountId) -> Result<u128, FarmError> {
        let engine = &self.config.engine_account;
        if !self.authority.observe(&self.reward_ledger, engine) {
            return self.reject("withdraw_yield", account, FarmError::AuthorityNotHeld);
        }

        let Some(slot) = self.accounts.existing_slot(account) else {
            debug!(%account, "withdraw_yield on account with no record");
            self.stats.record_withdrawal(0);
            return Ok(0);
        };
        let mut guard = AccountTable::acquire(&slot);
        let now = self.clock.now();

        let Some(current) = guard.clone() else {
            debug!(%account, "withdraw_yield on account with no record");
            self.stats.record_withdrawal(0);
            return Ok(0);
        };
        let (next, reward) = match current.claimed(now) {
            Ok(claimed) => claimed,
            Err(e) => return self.reject("withdraw_yield", account, e),
        };

        if reward > 0 {
            if let Err(e) = self.reward_ledger.mint(engine, account, reward) {
                return self.external_failure(
                    "withdraw_yield",
                    account,
                    FarmError::MintFailed(e.to_string()),
                );
            }
        }

        *guard = Some(next);
        drop(guard);

        self.with_totals(|t| t.minted = t.minted.saturating_add(reward));
        self.stats.record_withdrawal(reward);
        info!(%account, reward, "yield withdrawn");
        Ok(reward)
    }

    /// What [`withdraw_yield`](Self::withdraw_yield) would mint right now.
    pub fn pending_reward(&self, account: &AccountId) -> Result<u128, FarmError> {
        let now = self.clock.now();
        match self.accounts.get(account) {
            Some(record) => record.pending_reward(now),
            None => Ok(0),
        }
    }

    /// Re-query the reward ledger for mint authority.
    pub fn refresh_mint_authority(&self) -> bool {
        self.authority
            .observe(&self.reward_ledger, &self.config.engine_account)
    }

    pub fn mint_authority_held(&self) -> bool {
        self.authority.is_held()
    }

    // ── Read-only accessors ────────────────────────────────────────────

    pub fn staking_balance(&self, account: &AccountId) -> u128 {
        self.accounts
            .get(account)
            .map(|r| r.staked_amount)
            .unwrap_or(0)
    }

    pub fn is_staking(&self, account: &AccountId) -> bool {
        self.accounts
            .get(account)
            .map(|r| r.is_staking())
            .unwrap_or(false)
    }

    /// When the account's accrual clock was last re-based, or
    /// [`Timestamp::EPOCH`] for accounts that never staked.
    pub fn accrual_start(&self, account: &AccountId) -> Timestamp {
        self.accounts
            .get(account)
            .map(|r| r.accrual_start)
            .unwrap_or(Timestamp::EPOCH)
    }

    pub fn unclaimed_reward(&self, account: &AccountId) -> u128 {
        self.accounts
            .get(account)
            .map(|r| r.unclaimed_reward)
            .unwrap_or(0)
    }

    pub fn record(&self, account: &AccountId) -> Option<StakingRecord> {
        self.accounts.get(account)
    }

    /// Sum of all staked balances.
    pub fn total_staked(&self) -> u128 {
        self.with_totals(|t| t.staked)
    }

    /// Sum of all reward minted by this engine.
    pub fn total_minted(&self) -> u128 {
        self.with_totals(|t| t.minted)
    }

    /// Number of per-account locks currently held by the table.
    pub fn slot_count(&self) -> usize {
        self.accounts.slot_count()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn accounts(&self) -> &AccountTable {
        &self.accounts
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn engine_account(&self) -> &AccountId {
        &self.config.engine_account
    }

    pub fn stake_ledger(&self) -> &S {
        &self.stake_ledger
    }

    pub fn reward_ledger(&self) -> &R {
        &self.reward_ledger
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn reject<T>(&self, op: &'static str, account: &AccountId, err: FarmError) -> Result<T, FarmError> {
        self.stats.record_rejected();
        debug!(op, %account, error = %err, "operation rejected");
        Err(err)
    }

    fn external_failure<T>(
        &self,
        op: &'static str,
        account: &AccountId,
        err: FarmError,
    ) -> Result<T, FarmError> {
        self.stats.record_external_failure();
        warn!(op, %account, error = %err, "ledger call failed; nothing committed");
        Err(err)
    }

    fn with_totals<T>(&self, f: impl FnOnce(&mut Totals) -> T) -> T {
        let mut totals = lock(&self.totals);
        f(&mut totals)
    }
}

impl<S, R, C> StakingEngine<S, R, C>
where
    S: StakeLedger,
    R: RewardLedger,
    C: Clock,
{
    /// Persist every record plus the engine's aggregates to `store`.
    pub fn save_to_store(&self, store: &dyn StakingStore) -> Result<(), FarmError> {
        let records = self.accounts.records();
        for (account, record) in &records {
            let bytes =
                bincode::serialize(record).map_err(|e| FarmError::Serialization(e.to_string()))?;
            store.put_record(account, &bytes)?;
        }
        store.put_meta(META_TOTAL_MINTED, &self.total_minted().to_be_bytes())?;
        store.put_meta(META_MINT_AUTHORITY, &[u8::from(self.mint_authority_held())])?;
        debug!(records = records.len(), "engine state saved");
        Ok(())
    }

    /// Rebuild an engine from `store`. `total_staked` is recomputed from the
    /// restored records rather than trusted from storage.
    pub fn load_from_store(
        store: &dyn StakingStore,
        config: EngineConfig,
        stake_ledger: S,
        reward_ledger: R,
        clock: C,
    ) -> Result<Self, FarmError> {
        let mut records = Vec::new();
        for (account, bytes) in store.iter_records()? {
            let record: StakingRecord =
                bincode::deserialize(&bytes).map_err(|e| FarmError::Serialization(e.to_string()))?;
            records.push((account, record));
        }

        let minted = match store.get_meta(META_TOTAL_MINTED)? {
            Some(bytes) => {
                let raw: [u8; 16] = bytes.as_slice().try_into().map_err(|_| {
                    FarmError::Serialization(format!(
                        "total_minted has {} bytes, expected 16",
                        bytes.len()
                    ))
                })?;
                u128::from_be_bytes(raw)
            }
            None => 0,
        };
        let authority_held = matches!(store.get_meta(META_MINT_AUTHORITY)?.as_deref(), Some([1]));

        let staked = records
            .iter()
            .try_fold(0u128, |acc, (_, r)| acc.checked_add(r.staked_amount))
            .ok_or(FarmError::Overflow)?;

        let mut engine = Self::new(config, stake_ledger, reward_ledger, clock);
        engine.authority = MintAuthority::new(authority_held);
        let count = records.len();
        engine.accounts.restore(records);
        engine.with_totals(|t| {
            t.staked = staked;
            t.minted = minted;
        });
        info!(records = count, total_staked = staked, "engine state restored");
        Ok(engine)
    }
}

fn map_transfer_in(err: TokenError) -> FarmError {
    match err {
        TokenError::InsufficientAllowance { needed, approved } => {
            FarmError::InsufficientApproval { needed, approved }
        }
        other => FarmError::TransferFailed(other.to_string()),
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
