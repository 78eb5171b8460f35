//! Capability traits for the two external ledgers.
//!
//! Every mutating call names its caller explicitly; there is no implicit
//! message sender. Methods take `&self` so a single ledger can be shared
//! between the farm and the accounts using it.

use crate::TokenError;
use farm_types::AccountId;

/// A transferable asset ledger. The farm pulls deposits with
/// [`transfer_from`](StakeLedger::transfer_from) and pays them back with
/// [`transfer`](StakeLedger::transfer).
pub trait StakeLedger: Send + Sync {
    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Move `amount` out of `from`'s own balance.
    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError>;

    fn balance_of(&self, account: &AccountId) -> u128;

    /// Set `spender`'s allowance over `owner`'s balance. Approval is the
    /// depositor's responsibility, never the farm's.
    fn approve(&self, owner: &AccountId, spender: &AccountId, amount: u128) -> Result<(), TokenError>;

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128;
}

/// A mintable asset ledger with a single owner holding mint authority.
pub trait RewardLedger: Send + Sync {
    /// Issue `amount` new units to `to`. Only the current owner may mint.
    fn mint(&self, minter: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError>;

    fn total_supply(&self) -> u128;

    fn balance_of(&self, account: &AccountId) -> u128;

    /// The principal currently holding mint authority, if any.
    fn owner(&self) -> Option<AccountId>;

    /// Hand mint authority to `new_owner`. Only the current owner may call this.
    fn transfer_ownership(&self, caller: &AccountId, new_owner: &AccountId) -> Result<(), TokenError>;
}

impl<L: StakeLedger + ?Sized> StakeLedger for std::sync::Arc<L> {
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        (**self).transfer_from(spender, from, to, amount)
    }

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        (**self).transfer(from, to, amount)
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        (**self).balance_of(account)
    }

    fn approve(&self, owner: &AccountId, spender: &AccountId, amount: u128) -> Result<(), TokenError> {
        (**self).approve(owner, spender, amount)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        (**self).allowance(owner, spender)
    }
}

impl<L: RewardLedger + ?Sized> RewardLedger for std::sync::Arc<L> {
    fn mint(&self, minter: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        (**self).mint(minter, to, amount)
    }

    fn total_supply(&self) -> u128 {
        (**self).total_supply()
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        (**self).balance_of(account)
    }

    fn owner(&self) -> Option<AccountId> {
        (**self).owner()
    }

    fn transfer_ownership(&self, caller: &AccountId, new_owner: &AccountId) -> Result<(), TokenError> {
        (**self).transfer_ownership(caller, new_owner)
    }
}
