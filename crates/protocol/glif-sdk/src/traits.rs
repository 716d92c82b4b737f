//! The SDK boundary the CLI talks to.
//!
//! [`PoolsSdk`] exposes three surfaces:
//! - [`Act`] - mutating contract calls that return a transaction hash
//! - [`Query`] - read-only state and receipt lookups
//! - [`Extern`] - scoped connections to the underlying chain client

use std::fmt;
use std::ops::Deref;

use async_trait::async_trait;
use glif_types::{EthAddress, FilAddress, TxHash, U256};

use crate::error::SdkResult;
use crate::types::{ActorCode, BuiltinActor, Receipt};
use crate::wallet::Signer;

/// Mutating protocol calls.
#[async_trait]
pub trait Act: Send + Sync {
    /// Confirm a pending worker-address change on `miner`, owned by `agent`.
    async fn agent_confirm_miner_worker_change(
        &self,
        agent: EthAddress,
        miner: &FilAddress,
        signer: &Signer,
    ) -> SdkResult<TxHash>;

    /// Approve `spender` to move `allowance` atto-iFIL from the signer.
    async fn ifil_approve(
        &self,
        spender: EthAddress,
        allowance: U256,
        signer: &Signer,
    ) -> SdkResult<TxHash>;
}

/// Read-only protocol and chain queries.
#[async_trait]
pub trait Query: Send + Sync {
    /// Wait until `tx` is included. Reverted transactions are errors.
    async fn state_wait_receipt(&self, tx: &TxHash) -> SdkResult<Receipt>;

    /// iFIL balance of `holder` in atto units.
    async fn ifil_balance_of(&self, holder: EthAddress) -> SdkResult<u128>;

    /// Native FIL balance of `addr` in atto units.
    async fn balance(&self, addr: EthAddress) -> SdkResult<u128>;
}

/// Access to the chain client behind the SDK.
#[async_trait]
pub trait Extern: Send + Sync {
    /// Open a chain-client connection, released when the guard drops.
    async fn connect_chain_client(&self) -> SdkResult<ChainConnection>;
}

/// Chain-client calls used for address resolution.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Code CID of the actor at `addr`.
    async fn actor_code(&self, addr: &FilAddress) -> SdkResult<ActorCode>;

    /// Code CID of a builtin actor on the current network version.
    async fn builtin_actor_code(&self, actor: BuiltinActor) -> SdkResult<ActorCode>;

    /// ID address of `addr`.
    async fn lookup_id(&self, addr: &FilAddress) -> SdkResult<FilAddress>;
}

/// The full SDK.
pub trait PoolsSdk: Send + Sync {
    fn act(&self) -> &dyn Act;
    fn query(&self) -> &dyn Query;
    fn extern_(&self) -> &dyn Extern;
}

type Closer = Box<dyn FnOnce() + Send>;

/// A scoped chain-client connection.
///
/// Dereferences to the client. The closer runs exactly once, when the
/// guard is dropped, whether the caller succeeded or bailed out with `?`.
pub struct ChainConnection {
    client: Box<dyn ChainClient>,
    closer: Option<Closer>,
}

impl ChainConnection {
    pub fn new(client: Box<dyn ChainClient>, closer: impl FnOnce() + Send + 'static) -> Self {
        Self {
            client,
            closer: Some(Box::new(closer)),
        }
    }
}

impl Deref for ChainConnection {
    type Target = dyn ChainClient;

    fn deref(&self) -> &Self::Target {
        self.client.as_ref()
    }
}

impl Drop for ChainConnection {
    fn drop(&mut self) {
        if let Some(closer) = self.closer.take() {
            closer();
        }
    }
}

impl fmt::Debug for ChainConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainConnection")
            .field("open", &self.closer.is_some())
            .finish()
    }
}
