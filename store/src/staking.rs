use crate::StoreError;
use farm_types::AccountId;

/// Store trait for persisting staking engine state to durable storage.
///
/// Uses opaque `Vec<u8>` so the store doesn't depend on the `farm-engine`
/// crate. The engine serializes/deserializes its own records.
pub trait StakingStore {
    fn get_record(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_record(&self, account: &AccountId, record: &[u8]) -> Result<(), StoreError>;
    fn iter_records(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError>;

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
