//! farm: command-line front end for a file-persisted stake farm.

mod clock;
mod config;
mod error;
mod farm;
mod state;

use std::path::PathBuf;

use clap::Parser;

use farm_engine::{EngineConfig, StakeRebase};
use farm_types::AccountId;
use farm_utils::LogFormat;

use crate::clock::FarmClock;
use crate::config::FarmConfig;
use crate::error::CliError;
use crate::farm::{Farm, DEFAULT_REWARD_SUPPLY};

#[derive(Parser)]
#[command(name = "farm", about = "Single-asset stake farm with daily reward accrual")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "FARM_CONFIG")]
    config: Option<PathBuf>,

    /// State file holding the engine and both token ledgers.
    #[arg(long, env = "FARM_STATE")]
    state: Option<PathBuf>,

    /// Account the engine uses for custody and minting.
    #[arg(long, env = "FARM_ENGINE_ACCOUNT")]
    engine_account: Option<AccountId>,

    /// What `stake` does with accrual on an existing balance: "settle" or "discard".
    #[arg(long, env = "FARM_STAKE_REBASE")]
    stake_rebase: Option<StakeRebase>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FARM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FARM_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Pin the clock to this unix time (seconds) instead of wall-clock time.
    #[arg(long, env = "FARM_NOW")]
    at: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Deploy the stake token, the reward token and the engine, then hand
    /// reward-token ownership to the engine.
    Init {
        /// Initial reward token supply, credited to the owner.
        #[arg(long, default_value_t = DEFAULT_REWARD_SUPPLY)]
        reward_supply: u128,

        /// Initial reward token owner.
        #[arg(long, default_value = "deployer")]
        owner: AccountId,

        /// Replace an existing state file.
        #[arg(long)]
        force: bool,
    },
    #[command(flatten)]
    Account(AccountCommand),
}

#[derive(clap::Subcommand)]
enum AccountCommand {
    /// Faucet-mint stake asset to an account.
    Fund { account: AccountId, amount: u128 },
    /// Approve the engine to pull up to `amount` of stake asset from an account.
    Approve { account: AccountId, amount: u128 },
    /// Deposit stake asset into the farm.
    Stake { account: AccountId, amount: u128 },
    /// Return stake asset from the farm.
    Unstake { account: AccountId, amount: u128 },
    /// Mint all reward owed to an account.
    Withdraw { account: AccountId },
    /// Print an account's position as JSON.
    Status { account: AccountId },
}

fn resolve_config(cli: &Cli) -> Result<FarmConfig, CliError> {
    let base = match &cli.config {
        Some(path) => FarmConfig::from_toml_file(path)?,
        None => FarmConfig::default(),
    };
    Ok(FarmConfig {
        state_path: cli.state.clone().unwrap_or(base.state_path),
        engine_account: cli.engine_account.clone().unwrap_or(base.engine_account),
        stake_rebase: cli.stake_rebase.unwrap_or(base.stake_rebase),
        log_level: cli.log_level.clone().unwrap_or(base.log_level),
        log_format: cli.log_format.unwrap_or(base.log_format),
    })
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    farm_utils::init_logging(config.log_format, &config.log_level)?;

    let engine_config = EngineConfig::new(config.engine_account.clone())
        .with_stake_rebase(config.stake_rebase);
    let clock = FarmClock::from_flag(cli.at);
    let path = config.state_path.as_path();

    match cli.command {
        Command::Init {
            reward_supply,
            owner,
            force,
        } => {
            if path.exists() && !force {
                return Err(CliError::AlreadyInitialized(path.display().to_string()).into());
            }
            let farm = Farm::deploy(path, engine_config, &owner, reward_supply, clock)?;
            farm.save()?;
            print_json(&serde_json::json!({
                "state": farm.path().display().to_string(),
                "engine_account": config.engine_account,
                "reward_supply": reward_supply,
                "reward_owner": farm.reward_token.owner(),
                "mint_authority_held": farm.engine.mint_authority_held(),
            }))
        }
        Command::Account(command) => {
            let farm = Farm::load(path, engine_config, clock)?;
            let output = execute(&farm, &command)?;
            if !matches!(command, AccountCommand::Status { .. }) {
                farm.save()?;
            }
            print_json(&output)
        }
    }
}

fn execute(farm: &Farm, command: &AccountCommand) -> anyhow::Result<serde_json::Value> {
    let output = match command {
        AccountCommand::Fund { account, amount } => {
            let balance = farm.fund(account, *amount)?;
            serde_json::json!({ "account": account, "stake_token_balance": balance })
        }
        AccountCommand::Approve { account, amount } => {
            farm.approve(account, *amount)?;
            serde_json::json!({ "account": account, "allowance": amount })
        }
        AccountCommand::Stake { account, amount } => {
            let staked = farm.engine.stake(account, *amount)?;
            serde_json::json!({ "account": account, "staking_balance": staked })
        }
        AccountCommand::Unstake { account, amount } => {
            let staked = farm.engine.unstake(account, *amount)?;
            serde_json::json!({ "account": account, "staking_balance": staked })
        }
        AccountCommand::Withdraw { account } => {
            let minted = farm.engine.withdraw_yield(account)?;
            serde_json::json!({ "account": account, "minted": minted })
        }
        AccountCommand::Status { account } => serde_json::to_value(farm.status(account)?)?,
    };
    Ok(output)
}
