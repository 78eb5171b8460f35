//! In-memory fungible token ledger.
//!
//! Covers both asset shapes the farm works with:
//! - a freely mintable mock asset with no owner ([`TokenLedger::mock`]), used
//!   as the stake asset
//! - an owned asset created with a fixed initial supply
//!   ([`TokenLedger::with_supply`]), used as the reward asset; only its owner
//!   may mint

use crate::error::TokenError;
use crate::ledger::{RewardLedger, StakeLedger};
use farm_types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Serializable contents of a [`TokenLedger`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub name: String,
    pub symbol: String,
    pub owner: Option<AccountId>,
    pub total_supply: u128,
    pub balances: BTreeMap<AccountId, u128>,
    /// owner → spender → remaining allowance.
    pub allowances: BTreeMap<AccountId, BTreeMap<AccountId, u128>>,
}

impl TokenState {
    fn balance(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|m| m.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Compute both new balances before touching either, so a failed move
    /// leaves the ledger untouched.
    fn move_balance(&mut self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        let available = self.balance(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                account: from.clone(),
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), to_balance);
        Ok(())
    }

    fn credit_new_supply(&mut self, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self.balance(to).checked_add(amount).ok_or(TokenError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(to.clone(), balance);
        Ok(())
    }
}

/// A thread-safe in-memory token ledger.
#[derive(Debug, Default)]
pub struct TokenLedger {
    state: Mutex<TokenState>,
}

impl TokenLedger {
    /// An ownerless token with zero supply. Anyone may create units through
    /// [`faucet_mint`](Self::faucet_mint).
    pub fn mock(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self::from_state(TokenState {
            name: name.into(),
            symbol: symbol.into(),
            ..TokenState::default()
        })
    }

    /// An owned token whose entire initial supply is credited to `owner`.
    pub fn with_supply(
        name: impl Into<String>,
        symbol: impl Into<String>,
        owner: AccountId,
        supply: u128,
    ) -> Result<Self, TokenError> {
        if supply == 0 {
            return Err(TokenError::ZeroSupply);
        }
        let mut balances = BTreeMap::new();
        balances.insert(owner.clone(), supply);
        Ok(Self::from_state(TokenState {
            name: name.into(),
            symbol: symbol.into(),
            owner: Some(owner),
            total_supply: supply,
            balances,
            allowances: BTreeMap::new(),
        }))
    }

    pub fn from_state(state: TokenState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Copy of the full ledger contents, for persistence.
    pub fn snapshot(&self) -> TokenState {
        self.lock().clone()
    }

    pub fn name(&self) -> String {
        self.lock().name.clone()
    }

    pub fn symbol(&self) -> String {
        self.lock().symbol.clone()
    }

    pub fn balance_of(&self, account: &AccountId) -> u128 {
        self.lock().balance(account)
    }

    pub fn total_supply(&self) -> u128 {
        self.lock().total_supply
    }

    pub fn owner(&self) -> Option<AccountId> {
        self.lock().owner.clone()
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.lock().allowance(owner, spender)
    }

    /// Create units out of thin air. Only ownerless tokens allow this.
    pub fn faucet_mint(&self, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        let mut state = self.lock();
        if state.owner.is_some() {
            return Err(TokenError::Rejected(format!(
                "{} has an owner; only the owner may mint",
                state.symbol
            )));
        }
        state.credit_new_supply(to, amount)
    }

    fn lock(&self) -> MutexGuard<'_, TokenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StakeLedger for TokenLedger {
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        let mut state = self.lock();
        let approved = state.allowance(from, spender);
        if approved < amount {
            return Err(TokenError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }
        state.move_balance(from, to, amount)?;
        state
            .allowances
            .entry(from.clone())
            .or_default()
            .insert(spender.clone(), approved - amount);
        tracing::trace!(token = %state.symbol, %from, %to, amount, "transfer_from");
        Ok(())
    }

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        let mut state = self.lock();
        state.move_balance(from, to, amount)?;
        tracing::trace!(token = %state.symbol, %from, %to, amount, "transfer");
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        TokenLedger::balance_of(self, account)
    }

    fn approve(&self, owner: &AccountId, spender: &AccountId, amount: u128) -> Result<(), TokenError> {
        self.lock()
            .allowances
            .entry(owner.clone())
            .or_default()
            .insert(spender.clone(), amount);
        Ok(())
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        TokenLedger::allowance(self, owner, spender)
    }
}

impl RewardLedger for TokenLedger {
    fn mint(&self, minter: &AccountId, to: &AccountId, amount: u128) -> Result<(), TokenError> {
        let mut state = self.lock();
        if state.owner.as_ref() != Some(minter) {
            return Err(TokenError::NotOwner {
                caller: minter.clone(),
            });
        }
        state.credit_new_supply(to, amount)?;
        tracing::trace!(token = %state.symbol, %to, amount, "mint");
        Ok(())
    }

    fn total_supply(&self) -> u128 {
        TokenLedger::total_supply(self)
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        TokenLedger::balance_of(self, account)
    }

    fn owner(&self) -> Option<AccountId> {
        TokenLedger::owner(self)
    }

    fn transfer_ownership(&self, caller: &AccountId, new_owner: &AccountId) -> Result<(), TokenError> {
        let mut state = self.lock();
        if state.owner.as_ref() != Some(caller) {
            return Err(TokenError::NotOwner {
                caller: caller.clone(),
            });
        }
        state.owner = Some(new_owner.clone());
        tracing::debug!(token = %state.symbol, from = %caller, to = %new_owner, "ownership transferred");
        Ok(())
    }
}
