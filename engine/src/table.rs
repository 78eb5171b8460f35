//! The account state table.
//!
//! Each account gets its own lock. Operations on the same account are
//! serialized for their full duration (including external ledger calls),
//! while different accounts proceed in parallel. The map lock is only held
//! long enough to look up or create an entry.

use crate::record::StakingRecord;
use farm_types::AccountId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An account's slot. `None` until an operation first commits a record.
pub type Slot = Option<StakingRecord>;

/// Exclusive access to one account's slot, held for an entire operation.
pub type SlotGuard<'a> = MutexGuard<'a, Slot>;

#[derive(Debug, Default)]
pub struct AccountTable {
    slots: Mutex<HashMap<AccountId, Arc<Mutex<Slot>>>>,
}

impl AccountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the lock for `account`. Creating a slot does not create
    /// a record.
    pub fn slot(&self, account: &AccountId) -> Arc<Mutex<Slot>> {
        let mut slots = lock(&self.slots);
        slots
            .entry(account.clone())
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone()
    }

    /// The lock for `account` if one exists. Never creates a slot.
    pub fn existing_slot(&self, account: &AccountId) -> Option<Arc<Mutex<Slot>>> {
        lock(&self.slots).get(account).cloned()
    }

    /// Lock a slot obtained from [`slot`](Self::slot).
    pub fn acquire(slot: &Mutex<Slot>) -> SlotGuard<'_> {
        lock(slot)
    }

    /// Copy of an account's record, waiting for any in-flight operation on
    /// that account to finish.
    pub fn get(&self, account: &AccountId) -> Option<StakingRecord> {
        let slot = lock(&self.slots).get(account).cloned()?;
        let record = lock(&slot).clone();
        record
    }

    /// Number of accounts with a committed record.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every committed record.
    pub fn records(&self) -> Vec<(AccountId, StakingRecord)> {
        let slots: Vec<(AccountId, Arc<Mutex<Slot>>)> = lock(&self.slots)
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect();
        slots
            .into_iter()
            .filter_map(|(account, slot)| lock(&slot).clone().map(|r| (account, r)))
            .collect()
    }

    /// Replace the table contents with `records`.
    pub fn restore(&self, records: impl IntoIterator<Item = (AccountId, StakingRecord)>) {
        let mut slots = lock(&self.slots);
        slots.clear();
        for (account, record) in records {
            slots.insert(account, Arc::new(Mutex::new(Some(record))));
        }
    }

    /// Give back a slot obtained from [`slot`](Self::slot) after an
    /// operation that committed nothing. The slot is removed if it is still
    /// empty and no other operation holds it. The caller must not hold the
    /// slot's lock.
    pub fn release(&self, account: &AccountId, slot: &Arc<Mutex<Slot>>) {
        let mut slots = lock(&self.slots);
        let idle = slots.get(account).is_some_and(|entry| {
            Arc::ptr_eq(entry, slot) && Arc::strong_count(slot) == 2 && lock(slot).is_none()
        });
        if idle {
            slots.remove(account);
        }
    }

    /// Number of slots, including empty ones.
    pub fn slot_count(&self) -> usize {
        lock(&self.slots).len()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_types::Timestamp;

    fn acct(name: &str) -> AccountId {
        AccountId::new(name)
    }

    #[test]
    fn slot_creation_does_not_create_record() {
        let table = AccountTable::new();
        let _slot = table.slot(&acct("alice"));
        assert_eq!(table.slot_count(), 1);
        assert!(table.is_empty());
        assert!(table.get(&acct("alice")).is_none());
    }

    #[test]
    fn committed_record_is_visible() {
        let table = AccountTable::new();
        let slot = table.slot(&acct("alice"));
        {
            let mut guard = AccountTable::acquire(&slot);
            *guard = Some(StakingRecord::new(Timestamp::new(5)));
        }
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get(&acct("alice")).unwrap().accrual_start,
            Timestamp::new(5)
        );
    }

    #[test]
    fn existing_slot_never_creates() {
        let table = AccountTable::new();
        assert!(table.existing_slot(&acct("ghost")).is_none());
        assert_eq!(table.slot_count(), 0);
        let _slot = table.slot(&acct("alice"));
        assert!(table.existing_slot(&acct("alice")).is_some());
    }

    #[test]
    fn release_removes_idle_empty_slot() {
        let table = AccountTable::new();
        let slot = table.slot(&acct("ghost"));
        table.release(&acct("ghost"), &slot);
        assert_eq!(table.slot_count(), 0);
    }

    #[test]
    fn release_keeps_shared_or_committed_slots() {
        let table = AccountTable::new();
        let slot = table.slot(&acct("busy"));
        let waiting = table.slot(&acct("busy"));
        table.release(&acct("busy"), &slot);
        assert_eq!(table.slot_count(), 1);
        drop(waiting);

        *AccountTable::acquire(&slot) = Some(StakingRecord::new(Timestamp::new(1)));
        table.release(&acct("busy"), &slot);
        assert_eq!(table.slot_count(), 1);
        assert!(table.get(&acct("busy")).is_some());
    }

    #[test]
    fn restore_replaces_contents() {
        let table = AccountTable::new();
        table.restore([(acct("a"), StakingRecord::new(Timestamp::new(1)))]);
        table.restore([
            (acct("b"), StakingRecord::new(Timestamp::new(2))),
            (acct("c"), StakingRecord::new(Timestamp::new(3))),
        ]);
        assert!(table.get(&acct("a")).is_none());
        assert_eq!(table.len(), 2);
    }
}
