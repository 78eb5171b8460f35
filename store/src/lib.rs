//! Abstract storage traits for the stake farm.
//!
//! Every storage backend (a state file, in-memory for testing) implements
//! these traits. The engine depends only on the traits and serializes its own
//! types.

pub mod error;
pub mod staking;

pub use error::StoreError;
pub use staking::StakingStore;
