//! Engine errors.
//!
//! Every variant is returned before any local state is committed, so a failed
//! call can always be retried safely.

use farm_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FarmError {
    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("the engine account cannot stake or unstake on its own farm")]
    EngineAccount,

    #[error("insufficient stake: requested {requested}, staked {staked}")]
    InsufficientStake { requested: u128, staked: u128 },

    #[error("insufficient approval: need {needed}, approved {approved}")]
    InsufficientApproval { needed: u128, approved: u128 },

    #[error("stake asset transfer failed: {0}")]
    TransferFailed(String),

    #[error("engine does not hold mint authority over the reward asset")]
    AuthorityNotHeld,

    #[error("reward mint failed: {0}")]
    MintFailed(String),

    #[error("arithmetic overflow in staking computation")]
    Overflow,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}
