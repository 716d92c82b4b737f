//! CLI error types.

use std::fmt;

use glif_sdk::SdkError;
use glif_store::StoreError;
use glif_types::{KeyRole, TypesError};
use thiserror::Error;

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

/// Broad classes of failure, shown next to every error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed address, amount or flag.
    Parse,
    /// Well-formed input that is not allowed.
    Validation,
    /// Keystore not migrated or a role key missing.
    Migration,
    /// Chain, SDK or wallet failure.
    External,
    /// The user declined to continue.
    Aborted,
    /// Bad configuration.
    Config,
    /// Local filesystem failure.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Parse => "parse",
            Self::Validation => "validation",
            Self::Migration => "migration",
            Self::External => "external",
            Self::Aborted => "aborted",
            Self::Config => "config",
            Self::Io => "io",
        };
        f.write_str(s)
    }
}

/// CLI error enum wrapping all crate errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed user input.
    #[error("{0}")]
    Parse(String),

    /// Input rejected by a command's rules.
    #[error("{0}")]
    Validation(String),

    /// Role keys still live in the legacy plaintext store.
    #[error("wallet not migrated to encrypted keystore. Please run \"glif wallet migrate\"")]
    NotMigrated,

    /// Role key absent from both the agent store and the legacy store.
    #[error("missing {0} key in legacy keys.toml")]
    MissingKey(KeyRole),

    /// Plaintext keys left behind after migration.
    #[error("unencrypted keys found in legacy keys.toml after migration. Remove to improve security.")]
    UnencryptedKeys,

    /// Empty passphrase at the prompt.
    #[error("Aborted")]
    Aborted,

    /// SDK or chain-client error.
    #[error("{0}")]
    Sdk(#[from] SdkError),

    /// Local store error.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Address or amount parse error.
    #[error("{0}")]
    Types(#[from] TypesError),

    /// IO error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Explicit exit status.
    #[error("exited with status {code}")]
    Exit { code: i32 },
}

impl CliError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) | Self::Types(_) => ErrorKind::Parse,
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotMigrated | Self::MissingKey(_) | Self::UnencryptedKeys => {
                ErrorKind::Migration
            }
            Self::Aborted => ErrorKind::Aborted,
            Self::Config(_) | Self::Toml(_) => ErrorKind::Config,
            Self::Io(_) | Self::Json(_) => ErrorKind::Io,
            Self::Store(e) => match e {
                StoreError::Types(_) => ErrorKind::Parse,
                StoreError::Encryption(_) => ErrorKind::External,
                _ => ErrorKind::Io,
            },
            Self::Sdk(e) => match e {
                SdkError::Types(_) => ErrorKind::Parse,
                SdkError::Config(_) => ErrorKind::Config,
                _ => ErrorKind::External,
            },
            Self::Exit { .. } => ErrorKind::External,
        }
    }

    /// Recovery hint shown under the error, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotMigrated => Some("Run `glif wallet migrate` to encrypt your keys"),
            Self::MissingKey(_) => Some("Restore keys.toml or the role entries in agent.toml"),
            Self::UnencryptedKeys => {
                Some("Back up keys.toml, then delete the private keys from it")
            }
            Self::Aborted => Some("Set GLIF_OWNER_PASSPHRASE or GLIF_OPERATOR_PASSPHRASE to skip the prompt"),
            Self::Config(_) | Self::Toml(_) => Some("Check config.toml in your glif directory"),
            Self::Sdk(SdkError::Network(_) | SdkError::Timeout(_)) => {
                Some("Check chain.rpc_url in config.toml and your connection")
            }
            Self::Sdk(SdkError::Config(_)) => Some("Set the missing value in config.toml"),
            Self::Sdk(SdkError::MultisigOwner) => {
                Some("Only single-signer owners are supported; set a single-signer owner in agent.toml")
            }
            Self::Sdk(SdkError::LedgerNotFound) => {
                Some("Connect and unlock your Ledger, or sign with an EVM owner key")
            }
            Self::Store(StoreError::Encryption(_)) => Some("Check the key passphrase"),
            _ => None,
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code } => *code,
            _ => 1,
        }
    }
}
