//! Engine operation counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome counters for engine operations, plus the volume that moved.
#[derive(Debug, Default)]
pub struct EngineStats {
    stakes: AtomicU64,
    unstakes: AtomicU64,
    withdrawals: AtomicU64,
    empty_withdrawals: AtomicU64,
    rejected: AtomicU64,
    external_failures: AtomicU64,
}

/// Point-in-time copy of [`EngineStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub stakes: u64,
    pub unstakes: u64,
    /// Withdrawals that minted a non-zero reward.
    pub withdrawals: u64,
    /// Withdrawals that found nothing owed.
    pub empty_withdrawals: u64,
    /// Calls refused before any ledger was touched.
    pub rejected: u64,
    /// Calls whose ledger transfer or mint failed.
    pub external_failures: u64,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_stake(&self) {
        bump(&self.stakes);
    }

    pub(crate) fn record_unstake(&self) {
        bump(&self.unstakes);
    }

    pub(crate) fn record_withdrawal(&self, reward: u128) {
        if reward > 0 {
            bump(&self.withdrawals);
        } else {
            bump(&self.empty_withdrawals);
        }
    }

    pub(crate) fn record_rejected(&self) {
        bump(&self.rejected);
    }

    pub(crate) fn record_external_failure(&self) {
        bump(&self.external_failures);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            stakes: self.stakes.load(Ordering::Relaxed),
            unstakes: self.unstakes.load(Ordering::Relaxed),
            withdrawals: self.withdrawals.load(Ordering::Relaxed),
            empty_withdrawals: self.empty_withdrawals.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            external_failures: self.external_failures.load(Ordering::Relaxed),
        }
    }
}

fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}
