//! Nullable asset ledgers: in-memory tokens with switchable failures.

use farm_token::{RewardLedger, StakeLedger, TokenError, TokenLedger};
use farm_types::AccountId;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// A stake asset ledger backed by a mock token.
///
/// `fail_transfers(true)` makes every transfer in either direction fail
/// without moving funds.
#[derive(Debug)]
pub struct NullStakeLedger {
    token: TokenLedger,
    fail_transfers: AtomicBool,
}

impl NullStakeLedger {
    pub fn new() -> Self {
        Self {
            token: TokenLedger::mock("Mock Dai", "mDAI"),
            fail_transfers: AtomicBool::new(false),
        }
    }

    /// Credit `amount` of freshly created stake asset to `account`.
    pub fn fund(&self, account: &AccountId, amount: u128) {
        self.token
            .faucet_mint(account, amount)
            .expect("mock token accepts faucet mints");
    }

    pub fn fail_transfers(&self, fail: bool) {
        self.fail_transfers.store(fail, Ordering::SeqCst);
    }

    pub fn token(&self) -> &TokenLedger {
        &self.token
    }

    fn check(&self) -> Result<(), TokenError> {
        if self.fail_transfers.load(Ordering::SeqCst) {
            return Err(TokenError::Rejected("transfers disabled".into()));
        }
        Ok(())
    }
}

impl Default for NullStakeLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl StakeLedger for NullStakeLedger {
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        self.check()?;
        self.token.transfer_from(spender, from, to, amount)
    }

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        self.check()?;
        StakeLedger::transfer(&self.token, from, to, amount)
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.token.balance_of(account)
    }

    fn approve(&self, owner: &AccountId, spender: &AccountId, amount: u128) -> Result<(), TokenError> {
        self.token.approve(owner, spender, amount)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.token.allowance(owner, spender)
    }
}

/// A reward asset ledger backed by an owned token.
///
/// `reject_mints(true)` makes every mint fail. Successful mints are counted.
#[derive(Debug)]
pub struct NullRewardLedger {
    token: TokenLedger,
    reject_mints: AtomicBool,
    mint_calls: AtomicU64,
}

impl NullRewardLedger {
    /// # Panics
    /// Panics if `initial_supply` is zero.
    pub fn new(owner: AccountId, initial_supply: u128) -> Self {
        Self {
            token: TokenLedger::with_supply("Reward", "RWD", owner, initial_supply)
                .expect("null reward ledger needs a non-zero initial supply"),
            reject_mints: AtomicBool::new(false),
            mint_calls: AtomicU64::new(0),
        }
    }

    pub fn reject_mints(&self, reject: bool) {
        self.reject_mints.store(reject, Ordering::SeqCst);
    }

    /// Number of mints that reached the token (successful or not).
    pub fn mint_calls(&self) -> u64 {
        self.mint_calls.load(Ordering::SeqCst)
    }

    pub fn token(&self) -> &TokenLedger {
        &self.token
    }
}

impl RewardLedger for NullRewardLedger {
    fn mint(&self, minter: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        self.mint_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_mints.load(Ordering::SeqCst) {
            return Err(TokenError::Rejected("mints disabled".into()));
        }
        self.token.mint(minter, to, amount)
    }

    fn total_supply(&self) -> u128 {
        self.token.total_supply()
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.token.balance_of(account)
    }

    fn owner(&self) -> Option<AccountId> {
        self.token.owner()
    }

    fn transfer_ownership(&self, caller: &AccountId, new_owner: &AccountId) -> Result<(), TokenError> {
        self.token.transfer_ownership(caller, new_owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_transfers_move_nothing() {
        let ledger = NullStakeLedger::new();
        let alice = AccountId::new("alice");
        let bob = AccountId::new("bob");
        ledger.fund(&alice, 10);
        ledger.fail_transfers(true);
        assert!(ledger.transfer(&alice, &bob, 5).is_err());
        assert_eq!(ledger.balance_of(&alice), 10);
        ledger.fail_transfers(false);
        ledger.transfer(&alice, &bob, 5).unwrap();
        assert_eq!(ledger.balance_of(&bob), 5);
    }

    #[test]
    fn rejected_mints_are_counted_but_not_issued() {
        let owner = AccountId::new("owner");
        let ledger = NullRewardLedger::new(owner.clone(), 100);
        ledger.reject_mints(true);
        assert!(ledger.mint(&owner, &owner, 1).is_err());
        assert_eq!(ledger.mint_calls(), 1);
        assert_eq!(ledger.total_supply(), 100);
    }
}
