//! Application context handed to every command.

use std::sync::Arc;

use glif_sdk::{PoolsSdk, RemotePools};
use glif_store::{AccountsStore, AgentStore, KeyStore, LegacyKeyStore};
use glif_types::Network;
use indicatif::ProgressBar;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::journal::Journal;
use crate::output::OutputFormat;
use crate::progress;
use crate::prompt::{PassphraseSource, TerminalPassphrases};

/// Everything a command needs: configuration, the SDK and local stores.
pub struct AppContext {
    /// Configuration.
    pub config: CliConfig,
    /// Output format for this invocation.
    pub format: OutputFormat,
    /// Network addresses are rendered for.
    pub network: Network,
    /// SDK boundary.
    pub sdk: Arc<dyn PoolsSdk>,
    /// Agent metadata and role addresses.
    pub agent: AgentStore,
    /// Labeled read-only accounts.
    pub accounts: AccountsStore,
    /// Pre-migration plaintext keys.
    pub legacy_keys: LegacyKeyStore,
    /// Encrypted keys.
    pub keystore: KeyStore,
    /// Audit journal.
    pub journal: Journal,
    /// Passphrase environment and prompt.
    pub passphrases: Arc<dyn PassphraseSource>,
}

impl AppContext {
    /// Context backed by the JSON-RPC gateway from the configuration.
    pub fn load(config: CliConfig, format: OutputFormat) -> CliResult<Self> {
        let sdk = RemotePools::new(config.sdk_config()?)?;
        Self::with_sdk(config, format, Arc::new(sdk))
    }

    /// Context backed by an arbitrary SDK.
    pub fn with_sdk(
        config: CliConfig,
        format: OutputFormat,
        sdk: Arc<dyn PoolsSdk>,
    ) -> CliResult<Self> {
        let network = config.chain.network;
        let agent = AgentStore::open(config.agent_path(), network)?;
        let accounts = AccountsStore::open(config.accounts_path(), network)?;
        let legacy_keys = LegacyKeyStore::open(config.legacy_keys_path())?;
        let keystore = KeyStore::open(config.keystore_dir())?;
        let journal = Journal::new(config.journal_path());

        Ok(Self {
            config,
            format,
            network,
            sdk,
            agent,
            accounts,
            legacy_keys,
            keystore,
            journal,
            passphrases: Arc::new(TerminalPassphrases),
        })
    }

    /// Replace the passphrase source.
    pub fn with_passphrases(mut self, passphrases: Arc<dyn PassphraseSource>) -> Self {
        self.passphrases = passphrases;
        self
    }

    /// Spinner honoring the output format and display settings.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        progress::for_format(self.format, self.config.display.spinners, msg)
    }
}
