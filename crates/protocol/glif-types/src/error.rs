//! Error types for address, amount and role parsing.

use thiserror::Error;

/// Result type alias for type-level parsing.
pub type TypesResult<T> = Result<T, TypesError>;

/// Errors produced while parsing or converting user-supplied values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// Malformed Filecoin address.
    #[error("invalid address {input}: {reason}")]
    InvalidAddress {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Address checksum did not match its payload.
    #[error("invalid address checksum: {0}")]
    Checksum(String),

    /// Network prefix was neither `f` nor `t`.
    #[error("unknown address network: {0}")]
    UnknownNetwork(String),

    /// Malformed 0x-style address.
    #[error("invalid EVM address: {0}")]
    InvalidEthAddress(String),

    /// Address has no direct EVM representation.
    #[error("cannot convert {0} to an EVM address")]
    NotEvmConvertible(String),

    /// Malformed token amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Unknown or empty pool name.
    #[error("{0}")]
    InvalidPool(String),

    /// Unknown key role name.
    #[error("invalid key role: {0}")]
    InvalidRole(String),

    /// Malformed transaction hash.
    #[error("invalid transaction hash: {0}")]
    InvalidTxHash(String),
}

impl TypesError {
    /// Create an InvalidAddress error.
    pub fn invalid_address(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
