//! Nullable store: thread-safe in-memory storage for testing.

use farm_store::{StakingStore, StoreError};
use farm_types::AccountId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// An in-memory staking store.
///
/// `fail_writes(true)` makes every put fail with [`StoreError::Backend`].
#[derive(Debug, Default)]
pub struct NullStore {
    records: Mutex<BTreeMap<AccountId, Vec<u8>>>,
    meta: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("writes disabled".into()));
        }
        Ok(())
    }
}

impl StakingStore for NullStore {
    fn get_record(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.records.lock().unwrap().get(account).cloned())
    }

    fn put_record(&self, account: &AccountId, record: &[u8]) -> Result<(), StoreError> {
        self.check_write()?;
        self.records
            .lock()
            .unwrap()
            .insert(account.clone(), record.to_vec());
        Ok(())
    }

    fn iter_records(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.check_write()?;
        self.meta.lock().unwrap().insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
