//! The on-disk farm: engine records, engine metadata and both token ledgers
//! in a single bincode file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use farm_store::{StakingStore, StoreError};
use farm_token::TokenState;
use farm_types::AccountId;

use crate::error::CliError;

/// Everything persisted between invocations.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FarmState {
    pub stake_token: TokenState,
    pub reward_token: TokenState,
    pub records: BTreeMap<AccountId, Vec<u8>>,
    pub meta: BTreeMap<Vec<u8>, Vec<u8>>,
}

/// A [`StakingStore`] backed by the state file.
///
/// Engine writes land in memory; [`FileStore::flush`] writes the whole file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    state: Mutex<FarmState>,
}

impl FileStore {
    pub fn create(path: impl Into<PathBuf>, state: FarmState) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(state),
        }
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CliError> {
        let path = path.into();
        if !path.exists() {
            return Err(CliError::NotInitialized(path.display().to_string()));
        }
        let bytes = std::fs::read(&path).map_err(|e| CliError::State(e.to_string()))?;
        let state: FarmState =
            bincode::deserialize(&bytes).map_err(|e| CliError::State(e.to_string()))?;
        Ok(Self::create(path, state))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stake_token(&self) -> TokenState {
        self.lock().stake_token.clone()
    }

    pub fn reward_token(&self) -> TokenState {
        self.lock().reward_token.clone()
    }

    pub fn set_tokens(&self, stake_token: TokenState, reward_token: TokenState) {
        let mut state = self.lock();
        state.stake_token = stake_token;
        state.reward_token = reward_token;
    }

    /// Write the state file, replacing the previous one atomically.
    pub fn flush(&self) -> Result<(), CliError> {
        let bytes =
            bincode::serialize(&*self.lock()).map_err(|e| CliError::State(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CliError::State(e.to_string()))?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, bytes).map_err(|e| CliError::State(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| CliError::State(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "state file written");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, FarmState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StakingStore for FileStore {
    fn get_record(&self, account: &AccountId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock().records.get(account).cloned())
    }

    fn put_record(&self, account: &AccountId, record: &[u8]) -> Result<(), StoreError> {
        self.lock().records.insert(account.clone(), record.to_vec());
        Ok(())
    }

    fn iter_records(&self) -> Result<Vec<(AccountId, Vec<u8>)>, StoreError> {
        Ok(self
            .lock()
            .records
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock().meta.get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.lock().meta.insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
