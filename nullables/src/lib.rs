//! Nullable infrastructure for deterministic testing.
//!
//! Everything the engine touches outside itself (clock, asset ledgers,
//! storage) sits behind a trait. This crate provides test implementations
//! that:
//! - Return deterministic values
//! - Can be controlled programmatically, including forced failures
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod ledger;
pub mod store;

pub use clock::NullClock;
pub use ledger::{NullRewardLedger, NullStakeLedger};
pub use store::NullStore;
