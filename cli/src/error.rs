use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("state file error: {0}")]
    State(String),

    #[error("no farm at {0}; run `farm init` first")]
    NotInitialized(String),

    #[error("a farm already exists at {0}; pass --force to replace it")]
    AlreadyInitialized(String),
}
