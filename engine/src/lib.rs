//! The staking accrual engine.
//!
//! Accounts deposit a stake asset and accrue a reward asset over time:
//! `reward = staked × ⌊Δt / 86 400⌋`, where `Δt` is measured from the
//! account's `accrual_start`.
//!
//! This crate handles:
//! - Stake custody (pull on stake, push back on unstake)
//! - Settlement of accrued reward whenever the accrual clock is re-based
//! - Reward issuance through a delegated mint authority
//! - Per-account serialization of all of the above
//! - Persisting and restoring the account table

pub mod accrual;
pub mod authority;
pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod stats;
pub mod table;

pub use accrual::accrue;
pub use authority::MintAuthority;
pub use config::{EngineConfig, StakeRebase};
pub use engine::StakingEngine;
pub use error::FarmError;
pub use record::StakingRecord;
pub use stats::{EngineStats, StatsSnapshot};
pub use table::AccountTable;
