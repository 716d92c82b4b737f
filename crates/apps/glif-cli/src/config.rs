//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use glif_sdk::{ReceiptConfig, RetryConfig, SdkConfig};
use glif_types::{EthAddress, Network};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Environment variable that overrides the default base directory.
pub const BASE_DIR_ENV: &str = "GLIF_CONFIG_DIR";

/// Expand environment variables in a string.
/// Supports `${VAR_NAME}` syntax. Unset variables are left as-is.
fn expand_env_vars(input: &str) -> CliResult<String> {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| CliError::config(format!("bad expansion pattern: {}", e)))?;
    Ok(re
        .replace_all(input, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
        })
        .to_string())
}

/// CLI configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Chain endpoint configuration.
    pub chain: ChainConfig,
    /// Protocol contract addresses.
    pub contracts: ContractsConfig,
    /// Receipt polling.
    pub receipts: ReceiptsConfig,
    /// Where local state lives.
    pub storage: StorageConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

impl CliConfig {
    /// Load configuration from a file.
    ///
    /// A missing file yields the defaults. Unless `storage.base_dir` is set,
    /// the base directory is the directory holding the config file.
    /// `${VAR}` references in the RPC URL and token are expanded.
    pub fn load(path: &Path) -> CliResult<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<Self>(&contents)?
        } else {
            Self::default()
        };

        if config.storage.base_dir.is_none() {
            config.storage.base_dir = path.parent().map(Path::to_path_buf);
        }

        if let Some(url) = &config.chain.rpc_url {
            config.chain.rpc_url = Some(expand_env_vars(url)?);
        }
        if let Some(token) = &config.chain.token {
            config.chain.token = Some(expand_env_vars(token)?);
        }

        Ok(config)
    }

    /// Load configuration from the default location.
    pub fn load_default() -> CliResult<Self> {
        Self::load(&default_config_path())
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the base directory for all glif data.
    pub fn base_dir(&self) -> PathBuf {
        self.storage
            .base_dir
            .clone()
            .unwrap_or_else(default_base_dir)
    }

    pub fn agent_path(&self) -> PathBuf {
        self.base_dir().join("agent.toml")
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.base_dir().join("accounts.toml")
    }

    pub fn legacy_keys_path(&self) -> PathBuf {
        self.base_dir().join("keys.toml")
    }

    pub fn keystore_dir(&self) -> PathBuf {
        self.base_dir().join("keystore")
    }

    pub fn journal_path(&self) -> PathBuf {
        self.base_dir().join("events.jsonl")
    }

    /// Build the gateway configuration.
    pub fn sdk_config(&self) -> CliResult<SdkConfig> {
        let mut sdk = SdkConfig::for_network(self.chain.network);
        if let Some(url) = &self.chain.rpc_url {
            sdk.rpc_url = url.clone();
        }
        sdk.token = self.chain.token.clone().filter(|t| !t.is_empty());
        sdk.ifil = self.contracts.ifil_address()?;
        sdk.request_timeout = Duration::from_secs(self.chain.request_timeout_secs);
        sdk.retry = RetryConfig {
            max_attempts: self.chain.retry_attempts,
            ..RetryConfig::default()
        };
        sdk.receipts = ReceiptConfig {
            timeout: Duration::from_secs(self.receipts.timeout_secs),
            poll_interval: Duration::from_secs(self.receipts.poll_interval_secs),
        };
        Ok(sdk)
    }
}

/// Chain endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// `mainnet` or `testnet`.
    pub network: Network,
    /// Lotus JSON-RPC endpoint. Defaults to the public GLIF node.
    pub rpc_url: Option<String>,
    /// Bearer token for the endpoint.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Attempts per request on transport errors.
    pub retry_attempts: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            rpc_url: None,
            token: None,
            request_timeout_secs: 30,
            retry_attempts: 3,
        }
    }
}

/// Protocol contract addresses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// iFIL token contract.
    pub ifil: Option<String>,
}

impl ContractsConfig {
    fn ifil_address(&self) -> CliResult<Option<EthAddress>> {
        match self.ifil.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|e| CliError::config(format!("contracts.ifil: {}", e))),
        }
    }
}

/// Receipt polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptsConfig {
    /// Give up waiting after this many seconds.
    pub timeout_secs: u64,
    /// Seconds between receipt lookups.
    pub poll_interval_secs: u64,
}

impl Default for ReceiptsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            poll_interval_secs: 5,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding agent.toml, accounts.toml, keys.toml and the keystore.
    pub base_dir: Option<PathBuf>,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Default output format.
    pub default_format: String,
    /// Show spinners while waiting on the chain.
    pub spinners: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_format: "human".to_string(),
            spinners: true,
        }
    }
}

/// Get the default base directory for glif data (`~/.glif`).
pub fn default_base_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(BASE_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".glif"))
        .unwrap_or_else(|| PathBuf::from(".glif"))
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    default_base_dir().join("config.toml")
}
