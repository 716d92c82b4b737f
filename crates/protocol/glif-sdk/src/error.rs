//! Error types for SDK calls.

use glif_store::StoreError;
use glif_types::TypesError;
use thiserror::Error;

/// Result type alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Errors that can occur while talking to the chain or signing.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the node
        message: String,
    },

    /// Network error (retryable).
    #[error("network error: {0}")]
    Network(String),

    /// Timeout error (retryable).
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Response did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Transaction was mined but reverted.
    #[error("transaction {0} reverted")]
    Reverted(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Signing wallet could not be used.
    #[error("wallet error: {0}")]
    Wallet(String),

    /// No hardware wallet backend is available for a native account.
    #[error("Ledger not found")]
    LedgerNotFound,

    /// The owner is a native multisig; only single-signer owners can sign.
    #[error("multisig owners are not supported")]
    MultisigOwner,

    /// Local keystore failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Address or amount conversion failure.
    #[error(transparent)]
    Types(#[from] TypesError),

    /// Internal error (lock poisoning, unexpected state).
    #[error("internal error: {0}")]
    Internal(String),
}

impl SdkError {
    /// Create a new Rpc error.
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Create a new Network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new Timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a new InvalidResponse error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a new Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Wallet error.
    pub fn wallet(msg: impl Into<String>) -> Self {
        Self::Wallet(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}
