//! The accrual formula.
//!
//! All values are integers: balances are `u128` raw units and durations are
//! whole seconds. Partial periods truncate to zero; nothing is ever rounded.

use farm_types::{FarmParams, Timestamp, REWARD_PER_UNIT_PER_PERIOD};

/// Reward owed for holding `staked` units for `elapsed_secs` seconds.
///
/// Returns `None` on overflow.
pub fn accrue(staked: u128, elapsed_secs: u64) -> Option<u128> {
    let periods = FarmParams::current().whole_periods(elapsed_secs) as u128;
    staked
        .checked_mul(periods)?
        .checked_mul(REWARD_PER_UNIT_PER_PERIOD)
}

/// Reward owed for holding `staked` units from `start` until `now`.
pub fn accrue_between(staked: u128, start: Timestamp, now: Timestamp) -> Option<u128> {
    accrue(staked, start.elapsed_since(now))
}
