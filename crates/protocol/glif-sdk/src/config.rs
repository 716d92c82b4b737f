//! Configuration for the JSON-RPC gateway.

use std::time::Duration;

use glif_types::{EthAddress, Network};

use crate::error::{SdkError, SdkResult};

/// Public GLIF mainnet node.
pub const MAINNET_RPC_URL: &str = "https://api.node.glif.io/rpc/v1";

/// Public GLIF calibration-net node.
pub const TESTNET_RPC_URL: &str = "https://api.calibration.node.glif.io/rpc/v1";

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Which network addresses are rendered for
    pub network: Network,

    /// Lotus JSON-RPC endpoint
    pub rpc_url: String,

    /// Optional bearer token for the endpoint
    pub token: Option<String>,

    /// iFIL token contract
    pub ifil: Option<EthAddress>,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,

    /// Receipt polling
    pub receipts: ReceiptConfig,

    /// Retry policy for transport errors
    pub retry: RetryConfig,
}

impl SdkConfig {
    /// Configuration for a network's public node.
    pub fn for_network(network: Network) -> Self {
        let rpc_url = match network {
            Network::Mainnet => MAINNET_RPC_URL,
            Network::Testnet => TESTNET_RPC_URL,
        };
        Self {
            network,
            rpc_url: rpc_url.to_string(),
            token: None,
            ifil: None,
            request_timeout: Duration::from_secs(30),
            receipts: ReceiptConfig::default(),
            retry: RetryConfig::default(),
        }
    }

    /// iFIL contract address, or a configuration error when unset.
    pub fn ifil_address(&self) -> SdkResult<EthAddress> {
        self.ifil
            .ok_or_else(|| SdkError::config("iFIL contract address is not configured"))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> SdkResult<()> {
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(SdkError::config(format!(
                "RPC URL must be http(s): {}",
                self.rpc_url
            )));
        }
        if self.receipts.poll_interval.is_zero() {
            return Err(SdkError::config("receipt poll interval must be non-zero"));
        }
        if self.retry.max_attempts == 0 {
            return Err(SdkError::config("retry max_attempts must be at least 1"));
        }
        Ok(())
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self::for_network(Network::Mainnet)
    }
}

/// How long to wait for a transaction receipt.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptConfig {
    /// Give up after this long
    pub timeout: Duration,
    /// Delay between polls
    pub poll_interval: Duration,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum retry attempts
    pub max_attempts: u32,
    /// Base delay for exponential backoff
    pub base_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}
