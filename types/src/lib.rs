//! Fundamental types for the stake farm.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identities, timestamps, the clock abstraction, and the fixed accrual
//! constants.

pub mod account;
pub mod error;
pub mod params;
pub mod time;

pub use account::AccountId;
pub use error::TypesError;
pub use params::{FarmParams, REWARD_PER_UNIT_PER_PERIOD, SECONDS_PER_PERIOD};
pub use time::{Clock, SystemClock, Timestamp};
