//! Command-line interface for GLIF Pools agents.
//!
//! This crate provides the `glif` binary. It includes commands for:
//!
//! - **Agent**: Show or set the agent address, confirm miner worker changes
//! - **iFIL**: Approve spenders, check balances
//! - **Wallet**: Label read-only accounts, list keys, migrate plaintext keys
//!
//! # Quick Start
//!
//! ```bash
//! # Move keys.toml into the encrypted keystore
//! glif wallet migrate
//!
//! # Point the CLI at your agent
//! glif agent id --address 0x...
//!
//! # Confirm a pending worker change
//! glif agent miners confirm-worker f01234
//!
//! # Approve a spender
//! glif ifil approve 0x... 1000000000000000000
//! ```
//!
//! # Output Formats
//!
//! All commands support `--format` for output control:
//!
//! - `human` (default): Human-readable with colors
//! - `json`: Machine-readable JSON
//!
//! # Configuration
//!
//! Configuration is loaded from `~/.glif/config.toml` (or
//! `$GLIF_CONFIG_DIR/config.toml`). Override with `--config`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod journal;
pub mod output;
pub mod preflight;
pub mod progress;
pub mod prompt;
pub mod resolver;
pub mod signer;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use cli::{Cli, Commands, OutputFormatArg};
pub use config::CliConfig;
pub use context::AppContext;
pub use error::{CliError, CliResult, ErrorKind};
pub use journal::{Journal, JournalEvent};
pub use output::{OutputFormat, Render};
pub use prompt::{PassphraseSource, ScriptedPassphrases, TerminalPassphrases};
