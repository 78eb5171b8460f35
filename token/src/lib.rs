//! Asset ledgers consumed by the stake farm.
//!
//! The farm never owns the asset ledgers it works with. It only sees them
//! through two small capabilities:
//! - [`StakeLedger`]: a transferable asset the farm takes custody of
//! - [`RewardLedger`]: a mintable asset whose mint authority the farm holds
//!
//! [`TokenLedger`] is an in-memory fungible token implementing both, used by
//! the CLI and by tests.

pub mod error;
pub mod ledger;
pub mod token;

pub use error::TokenError;
pub use ledger::{RewardLedger, StakeLedger};
pub use token::{TokenLedger, TokenState};
