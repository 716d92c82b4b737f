//! Minimal JSON-RPC 2.0 client over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::trace;

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use crate::retry::RetryPolicy;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client shared by the Lotus and Ethereum surfaces.
pub struct JsonRpcClient {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    retry: RetryPolicy,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(config: &SdkConfig) -> SdkResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SdkError::network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: config.rpc_url.clone(),
            token: config.token.clone().filter(|t| !t.is_empty()),
            retry: RetryPolicy::from_config(&config.retry),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method` and deserialize its result. `null` results deserialize
    /// into `Option` targets as `None`.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> SdkResult<T> {
        let value = self
            .retry
            .execute(|| self.call_once(method, params.clone()))
            .await?;
        serde_json::from_value(value)
            .map_err(|e| SdkError::invalid_response(format!("{}: {}", method, e)))
    }

    async fn call_once(&self, method: &str, params: Value) -> SdkResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        trace!(method, id, "JSON-RPC request");

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                SdkError::timeout(format!("{}: {}", method, e))
            } else {
                SdkError::network(format!("{}: {}", method, e))
            }
        })?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 429 {
            return Err(SdkError::network(format!("{}: HTTP {}", method, status)));
        }
        if !status.is_success() {
            return Err(SdkError::invalid_response(format!("{}: HTTP {}", method, status)));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| SdkError::invalid_response(format!("{}: {}", method, e)))?;
        if let Some(error) = body.error {
            return Err(SdkError::rpc(error.code, error.message));
        }
        Ok(body.result.unwrap_or(Value::Null))
    }
}

/// Parse a `0x`-prefixed hex quantity.
pub fn parse_quantity(s: &str) -> SdkResult<u128> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| SdkError::invalid_response(format!("quantity without 0x prefix: {}", s)))?;
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| SdkError::invalid_response(format!("bad quantity {}: {}", s, e)))
}

/// Render a hex quantity.
pub fn to_quantity(value: u128) -> String {
    format!("{:#x}", value)
}
