//! JSON-RPC implementation of the SDK against a Lotus node.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use alloy_primitives::{Bytes, TxKind, U256};
use glif_types::{EthAddress, FilAddress, TxHash};
use serde::Deserialize;
use serde_json::json;
use tokio::time::sleep;
use tracing::debug;

use crate::abi;
use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};
use crate::lotus::LotusClient;
use crate::rpc::{parse_quantity, JsonRpcClient};
use crate::traits::{Act, ChainConnection, Extern, PoolsSdk, Query};
use crate::transaction::TxEip1559;
use crate::types::Receipt;
use crate::wallet::Signer;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: String,
    status: String,
    block_number: String,
    gas_used: String,
    #[serde(default)]
    to: Option<String>,
}

/// Pools SDK backed by a node's `Filecoin.*` and `eth_*` JSON-RPC methods.
///
/// Transactions are signed locally and submitted raw.
pub struct RemotePools {
    rpc: Arc<JsonRpcClient>,
    config: SdkConfig,
    open_connections: Arc<AtomicUsize>,
}

impl RemotePools {
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;
        let rpc = Arc::new(JsonRpcClient::new(&config)?);
        debug!(url = %rpc.url(), network = ?config.network, "Configured chain gateway");
        Ok(Self {
            rpc,
            config,
            open_connections: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Chain connections currently held by callers.
    pub fn open_connections(&self) -> usize {
        self.open_connections.load(Ordering::SeqCst)
    }

    async fn quantity(&self, method: &str, params: serde_json::Value) -> SdkResult<u128> {
        let value: String = self.rpc.call(method, params).await?;
        parse_quantity(&value)
    }

    /// Fill in nonce, gas and fees, sign and submit a contract call.
    async fn send_call(&self, signer: &Signer, to: EthAddress, data: Vec<u8>) -> SdkResult<TxHash> {
        signer.ensure_single_signer()?;
        let from = signer
            .account()
            .eth_address()
            .ok_or(SdkError::LedgerNotFound)?;
        let from_hex = from.to_lower_hex();
        let call = json!({
            "from": from_hex,
            "to": to.to_lower_hex(),
            "data": format!("0x{}", hex::encode(&data)),
        });

        let chain_id = self.quantity("eth_chainId", json!([])).await?;
        let nonce = self
            .quantity("eth_getTransactionCount", json!([from_hex, "pending"]))
            .await?;
        let gas_limit = self.quantity("eth_estimateGas", json!([call])).await?;
        let priority_fee = self.quantity("eth_maxPriorityFeePerGas", json!([])).await?;
        let gas_price = self.quantity("eth_gasPrice", json!([])).await?;

        let tx = TxEip1559 {
            chain_id: u64::try_from(chain_id)
                .map_err(|_| SdkError::invalid_response("chain id out of range"))?,
            nonce: u64::try_from(nonce)
                .map_err(|_| SdkError::invalid_response("nonce out of range"))?,
            max_priority_fee_per_gas: priority_fee,
            max_fee_per_gas: gas_price.saturating_add(priority_fee),
            gas_limit: u64::try_from(gas_limit)
                .map_err(|_| SdkError::invalid_response("gas estimate out of range"))?,
            to: TxKind::Call(to.address()),
            value: U256::ZERO,
            input: Bytes::from(data),
            ..Default::default()
        };
        debug!(from = %from, to = %to, nonce = tx.nonce, gas = tx.gas_limit, "Submitting transaction");

        let raw = signer.sign(&tx)?;
        let hash: String = self
            .rpc
            .call(
                "eth_sendRawTransaction",
                json!([format!("0x{}", hex::encode(raw))]),
            )
            .await?;
        Ok(hash.parse()?)
    }
}

#[async_trait]
impl Act for RemotePools {
    async fn agent_confirm_miner_worker_change(
        &self,
        agent: EthAddress,
        miner: &FilAddress,
        signer: &Signer,
    ) -> SdkResult<TxHash> {
        let miner_id = miner
            .id()
            .ok_or_else(|| SdkError::config(format!("miner {} is not an ID address", miner)))?;
        self.send_call(signer, agent, abi::encode_confirm_change_miner_worker(miner_id))
            .await
    }

    async fn ifil_approve(
        &self,
        spender: EthAddress,
        allowance: U256,
        signer: &Signer,
    ) -> SdkResult<TxHash> {
        let ifil = self.config.ifil_address()?;
        self.send_call(signer, ifil, abi::encode_approve(&spender, allowance))
            .await
    }
}

#[async_trait]
impl Query for RemotePools {
    async fn state_wait_receipt(&self, tx: &TxHash) -> SdkResult<Receipt> {
        let started = Instant::now();
        let receipts = self.config.receipts;
        loop {
            let receipt: Option<RpcReceipt> = self
                .rpc
                .call("eth_getTransactionReceipt", json!([tx.to_string()]))
                .await?;

            if let Some(receipt) = receipt {
                let receipt = Receipt {
                    tx_hash: receipt.transaction_hash.parse()?,
                    success: parse_quantity(&receipt.status)? == 1,
                    block_number: u64::try_from(parse_quantity(&receipt.block_number)?)
                        .map_err(|_| SdkError::invalid_response("block number out of range"))?,
                    gas_used: u64::try_from(parse_quantity(&receipt.gas_used)?)
                        .map_err(|_| SdkError::invalid_response("gas used out of range"))?,
                    to: receipt.to.as_deref().map(str::parse).transpose()?,
                };
                if !receipt.success {
                    return Err(SdkError::Reverted(tx.to_string()));
                }
                return Ok(receipt);
            }

            if started.elapsed() >= receipts.timeout {
                return Err(SdkError::timeout(format!(
                    "no receipt for {} after {:?}",
                    tx, receipts.timeout
                )));
            }
            debug!(tx = %tx, "Receipt not yet available");
            sleep(receipts.poll_interval).await;
        }
    }

    async fn ifil_balance_of(&self, holder: EthAddress) -> SdkResult<u128> {
        let ifil = self.config.ifil_address()?;
        let call = json!({
            "to": ifil.to_lower_hex(),
            "data": format!("0x{}", hex::encode(abi::encode_balance_of(&holder))),
        });
        let result: String = self.rpc.call("eth_call", json!([call, "latest"])).await?;
        let digits = result.strip_prefix("0x").unwrap_or(&result);
        let bytes = hex::decode(digits)
            .map_err(|e| SdkError::invalid_response(format!("eth_call result: {}", e)))?;
        abi::decode_balance(&bytes)
    }

    async fn balance(&self, addr: EthAddress) -> SdkResult<u128> {
        self.quantity("eth_getBalance", json!([addr.to_lower_hex(), "latest"]))
            .await
    }
}

#[async_trait]
impl Extern for RemotePools {
    async fn connect_chain_client(&self) -> SdkResult<ChainConnection> {
        let open = self.open_connections.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(open, "Opened chain client");
        let counter = Arc::clone(&self.open_connections);
        Ok(ChainConnection::new(
            Box::new(LotusClient::new(Arc::clone(&self.rpc))),
            move || {
                counter.fetch_sub(1, Ordering::SeqCst);
                debug!("Closed chain client");
            },
        ))
    }
}

impl PoolsSdk for RemotePools {
    fn act(&self) -> &dyn Act {
        self
    }

    fn query(&self) -> &dyn Query {
        self
    }

    fn extern_(&self) -> &dyn Extern {
        self
    }
}

