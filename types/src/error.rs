//! Errors raised while constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("account id must not be empty")]
    EmptyAccount,

    #[error("account id {0:?} contains whitespace")]
    InvalidAccount(String),
}
