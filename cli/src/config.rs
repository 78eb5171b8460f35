//! CLI configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use farm_engine::StakeRebase;
use farm_types::AccountId;
use farm_utils::LogFormat;

use crate::error::CliError;

/// Configuration for the `farm` tool.
///
/// Loaded from a TOML file via [`FarmConfig::from_toml_file`]; command-line
/// flags and environment variables override individual fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FarmConfig {
    /// File holding the engine records and both token ledgers.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,

    /// Identity the engine uses on both ledgers.
    #[serde(default = "default_engine_account")]
    pub engine_account: AccountId,

    /// How `stake` treats accrual on an existing balance.
    #[serde(default)]
    pub stake_rebase: StakeRebase,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./farm_state.bin")
}

fn default_engine_account() -> AccountId {
    AccountId::new("token-farm")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl FarmConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, CliError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CliError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CliError> {
        toml::from_str(s).map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, CliError> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            engine_account: default_engine_account(),
            stake_rebase: StakeRebase::default(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}
