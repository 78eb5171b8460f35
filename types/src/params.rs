//! Fixed accrual parameters.
//!
//! The reward rate is a constant of the farm, not a governable value: one unit
//! of stake held for one full period yields one unit of reward.

use serde::{Deserialize, Serialize};

/// Length of one accrual period in seconds (one day).
pub const SECONDS_PER_PERIOD: u64 = 86_400;

/// Reward units issued per staked unit per full period.
pub const REWARD_PER_UNIT_PER_PERIOD: u128 = 1;

/// Read-only view of the accrual parameters, for status output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmParams {
    pub seconds_per_period: u64,
    pub reward_per_unit_per_period: u128,
}

impl FarmParams {
    pub const fn current() -> Self {
        Self {
            seconds_per_period: SECONDS_PER_PERIOD,
            reward_per_unit_per_period: REWARD_PER_UNIT_PER_PERIOD,
        }
    }

    /// Number of whole periods contained in `elapsed_secs`. Partial periods
    /// are truncated.
    pub const fn whole_periods(&self, elapsed_secs: u64) -> u64 {
        elapsed_secs / self.seconds_per_period
    }
}

impl Default for FarmParams {
    fn default() -> Self {
        Self::current()
    }
}
