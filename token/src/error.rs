//! Token ledger errors.

use farm_types::AccountId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance { needed: u128, approved: u128 },

    #[error("{caller} is not the token owner")]
    NotOwner { caller: AccountId },

    #[error("total supply must be greater than zero")]
    ZeroSupply,

    #[error("arithmetic overflow in token ledger")]
    Overflow,

    #[error("ledger rejected the call: {0}")]
    Rejected(String),
}
