//! Per-account staking state.

use crate::accrual::accrue_between;
use crate::error::FarmError;
use farm_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Staking state for a single account.
///
/// Created on the account's first successful stake and never deleted; an
/// account that fully unstakes keeps a zero-balance record so its accrual
/// clock restarts cleanly on the next stake.
///
/// Transitions are pure: each returns the next record and leaves `self`
/// untouched, so the engine can compute the outcome of an operation, perform
/// the external call, and only then commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingRecord {
    /// Stake asset currently held in engine custody for this account.
    pub staked_amount: u128,

    /// Point from which unsettled accrual is measured.
    pub accrual_start: Timestamp,

    /// Reward settled by earlier re-bases but not yet issued.
    pub unclaimed_reward: u128,
}

impl StakingRecord {
    /// A fresh record with an empty balance and the clock started at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            staked_amount: 0,
            accrual_start: now,
            unclaimed_reward: 0,
        }
    }

    pub fn is_staking(&self) -> bool {
        self.staked_amount > 0
    }

    /// Seconds of accrual not yet settled.
    pub fn accrued_time(&self, now: Timestamp) -> u64 {
        self.accrual_start.elapsed_since(now)
    }

    /// Reward accrued since `accrual_start` on the current balance.
    pub fn accrued_reward(&self, now: Timestamp) -> Result<u128, FarmError> {
        accrue_between(self.staked_amount, self.accrual_start, now).ok_or(FarmError::Overflow)
    }

    /// Everything a withdrawal at `now` would issue.
    pub fn pending_reward(&self, now: Timestamp) -> Result<u128, FarmError> {
        self.unclaimed_reward
            .checked_add(self.accrued_reward(now)?)
            .ok_or(FarmError::Overflow)
    }

    /// The instant a re-base at `now` moves the clock to. Never earlier than
    /// the current `accrual_start`, so a clock that steps backwards cannot
    /// make an already-settled period accrue a second time.
    pub fn rebase_point(&self, now: Timestamp) -> Timestamp {
        now.max(self.accrual_start)
    }

    /// Move accrued reward into `unclaimed_reward` and restart the clock.
    pub fn settled(&self, now: Timestamp) -> Result<Self, FarmError> {
        Ok(Self {
            staked_amount: self.staked_amount,
            accrual_start: self.rebase_point(now),
            unclaimed_reward: self.pending_reward(now)?,
        })
    }

    /// Add `amount` to the balance and restart the clock without settling.
    pub fn deposited(&self, amount: u128, now: Timestamp) -> Result<Self, FarmError> {
        let staked_amount = self
            .staked_amount
            .checked_add(amount)
            .ok_or(FarmError::Overflow)?;
        Ok(Self {
            staked_amount,
            accrual_start: self.rebase_point(now),
            unclaimed_reward: self.unclaimed_reward,
        })
    }

    /// Settle, then remove `amount` from the balance.
    pub fn withdrawn(&self, amount: u128, now: Timestamp) -> Result<Self, FarmError> {
        if amount > self.staked_amount {
            return Err(FarmError::InsufficientStake {
                requested: amount,
                staked: self.staked_amount,
            });
        }
        let settled = self.settled(now)?;
        Ok(Self {
            staked_amount: settled.staked_amount - amount,
            ..settled
        })
    }

    /// Settle and empty `unclaimed_reward`, returning the amount to issue.
    pub fn claimed(&self, now: Timestamp) -> Result<(Self, u128), FarmError> {
        let settled = self.settled(now)?;
        let reward = settled.unclaimed_reward;
        Ok((
            Self {
                unclaimed_reward: 0,
                ..settled
            },
            reward,
        ))
    }
}
