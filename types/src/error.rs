//! Errors raised while constructing or decoding core types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("realm name must be 1..={max} bytes, got {len}")]
    InvalidRealmName { len: usize, max: usize },
}
