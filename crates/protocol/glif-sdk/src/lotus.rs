//! Lotus `Filecoin.*` chain client.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use glif_types::FilAddress;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{SdkError, SdkResult};
use crate::rpc::JsonRpcClient;
use crate::traits::ChainClient;
use crate::types::{ActorCode, BuiltinActor};

/// IPLD link as Lotus renders it: `{"/": "bafy..."}`.
#[derive(Debug, Deserialize)]
struct Cid {
    #[serde(rename = "/")]
    cid: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ActorState {
    code: Cid,
}

/// Chain client speaking the Lotus JSON-RPC API.
pub struct LotusClient {
    rpc: Arc<JsonRpcClient>,
}

impl LotusClient {
    pub fn new(rpc: Arc<JsonRpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl ChainClient for LotusClient {
    async fn actor_code(&self, addr: &FilAddress) -> SdkResult<ActorCode> {
        let actor: ActorState = self
            .rpc
            .call("Filecoin.StateGetActor", json!([addr.to_string(), null]))
            .await?;
        Ok(ActorCode::new(actor.code.cid))
    }

    async fn builtin_actor_code(&self, actor: BuiltinActor) -> SdkResult<ActorCode> {
        let version: u64 = self
            .rpc
            .call("Filecoin.StateNetworkVersion", json!([null]))
            .await?;
        let codes: HashMap<String, Cid> = self
            .rpc
            .call("Filecoin.StateActorCodeCIDs", json!([version]))
            .await?;
        debug!(version, actors = codes.len(), "Fetched builtin actor manifest");
        codes
            .get(actor.manifest_key())
            .map(|c| ActorCode::new(c.cid.clone()))
            .ok_or_else(|| SdkError::invalid_response("actor code not found"))
    }

    async fn lookup_id(&self, addr: &FilAddress) -> SdkResult<FilAddress> {
        let id: String = self
            .rpc
            .call("Filecoin.StateLookupID", json!([addr.to_string(), null]))
            .await?;
        Ok(id.parse::<FilAddress>()?.with_network(addr.network()))
    }
}
