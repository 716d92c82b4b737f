//! In-memory SDK for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use glif_types::{Account, EthAddress, FilAddress, TxHash, U256};

use crate::error::{SdkError, SdkResult};
use crate::traits::{Act, ChainClient, ChainConnection, Extern, PoolsSdk, Query};
use crate::types::{ActorCode, BuiltinActor, Receipt};
use crate::wallet::Signer;

/// Code CID the mock reports for EVM actors.
pub const EVM_ACTOR_CODE: &str = "bafk2bzacemockevm";

/// Code CID the mock reports for EthAccount actors.
pub const ETH_ACCOUNT_ACTOR_CODE: &str = "bafk2bzacemockethaccount";

/// Code CID the mock reports for plain account actors.
pub const ACCOUNT_ACTOR_CODE: &str = "bafk2bzacemockaccount";

/// A call recorded by [`MockPools`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ConfirmWorker {
        agent: EthAddress,
        miner: FilAddress,
        from: Account,
    },
    Approve {
        spender: EthAddress,
        allowance: U256,
        from: Account,
    },
    WaitReceipt(TxHash),
    IfilBalanceOf(EthAddress),
    Balance(EthAddress),
}

#[derive(Default)]
struct MockState {
    actor_codes: HashMap<FilAddress, ActorCode>,
    id_lookups: HashMap<FilAddress, FilAddress>,
    balances: HashMap<EthAddress, u128>,
    ifil_balances: HashMap<EthAddress, u128>,
    calls: Vec<MockCall>,
    act_failure: Option<String>,
    connect_failure: Option<String>,
    revert: bool,
}

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    closed: AtomicUsize,
    chain_calls: AtomicUsize,
    tx_counter: AtomicU64,
}

/// Mock SDK implementation for testing.
///
/// Keeps chain state in memory and records every call. Clones share state.
#[derive(Clone, Default)]
pub struct MockPools {
    state: Arc<RwLock<MockState>>,
    counters: Arc<Counters>,
}

impl MockPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> MockPoolsBuilder {
        MockPoolsBuilder::new()
    }

    // =========================================================================
    // Assertion Helpers
    // =========================================================================

    /// All recorded act/query calls, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.read().unwrap().calls.clone()
    }

    /// Chain connections opened so far.
    pub fn connections_opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    /// Chain connections released so far.
    pub fn connections_closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }

    /// Number of calls made through chain connections.
    pub fn chain_calls(&self) -> usize {
        self.counters.chain_calls.load(Ordering::SeqCst)
    }

    /// Make subsequent act calls fail with `msg`.
    pub fn set_act_failure(&self, msg: Option<&str>) {
        self.state.write().unwrap().act_failure = msg.map(str::to_string);
    }

    fn record(&self, call: MockCall) {
        self.state.write().unwrap().calls.push(call);
    }

    fn next_tx_hash(&self) -> TxHash {
        let n = self.counters.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        TxHash(bytes)
    }

    fn act_result(&self) -> SdkResult<TxHash> {
        if let Some(msg) = &self.state.read().unwrap().act_failure {
            return Err(SdkError::rpc(-32000, msg.clone()));
        }
        Ok(self.next_tx_hash())
    }
}

#[async_trait]
impl Act for MockPools {
    async fn agent_confirm_miner_worker_change(
        &self,
        agent: EthAddress,
        miner: &FilAddress,
        signer: &Signer,
    ) -> SdkResult<TxHash> {
        self.record(MockCall::ConfirmWorker {
            agent,
            miner: miner.clone(),
            from: signer.account().clone(),
        });
        self.act_result()
    }

    async fn ifil_approve(
        &self,
        spender: EthAddress,
        allowance: U256,
        signer: &Signer,
    ) -> SdkResult<TxHash> {
        self.record(MockCall::Approve {
            spender,
            allowance,
            from: signer.account().clone(),
        });
        self.act_result()
    }
}

#[async_trait]
impl Query for MockPools {
    async fn state_wait_receipt(&self, tx: &TxHash) -> SdkResult<Receipt> {
        self.record(MockCall::WaitReceipt(*tx));
        if self.state.read().unwrap().revert {
            return Err(SdkError::Reverted(tx.to_string()));
        }
        Ok(Receipt {
            tx_hash: *tx,
            success: true,
            block_number: 1,
            gas_used: 21_000,
            to: None,
        })
    }

    async fn ifil_balance_of(&self, holder: EthAddress) -> SdkResult<u128> {
        self.record(MockCall::IfilBalanceOf(holder));
        Ok(self
            .state
            .read()
            .unwrap()
            .ifil_balances
            .get(&holder)
            .copied()
            .unwrap_or(0))
    }

    async fn balance(&self, addr: EthAddress) -> SdkResult<u128> {
        self.record(MockCall::Balance(addr));
        Ok(self
            .state
            .read()
            .unwrap()
            .balances
            .get(&addr)
            .copied()
            .unwrap_or(0))
    }
}

#[async_trait]
impl Extern for MockPools {
    async fn connect_chain_client(&self) -> SdkResult<ChainConnection> {
        if let Some(msg) = &self.state.read().unwrap().connect_failure {
            return Err(SdkError::network(msg.clone()));
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        let counters = Arc::clone(&self.counters);
        Ok(ChainConnection::new(
            Box::new(MockChainClient {
                state: Arc::clone(&self.state),
                counters: Arc::clone(&self.counters),
            }),
            move || {
                counters.closed.fetch_add(1, Ordering::SeqCst);
            },
        ))
    }
}

impl PoolsSdk for MockPools {
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

struct MockChainClient {
    state: Arc<RwLock<MockState>>,
    counters: Arc<Counters>,
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn actor_code(&self, addr: &FilAddress) -> SdkResult<ActorCode> {
        self.counters.chain_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .read()
            .unwrap()
            .actor_codes
            .get(addr)
            .cloned()
            .ok_or_else(|| SdkError::rpc(1, format!("actor not found: {}", addr)))
    }

    async fn builtin_actor_code(&self, actor: BuiltinActor) -> SdkResult<ActorCode> {
        self.counters.chain_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ActorCode::new(match actor {
            BuiltinActor::Evm => EVM_ACTOR_CODE,
            BuiltinActor::EthAccount => ETH_ACCOUNT_ACTOR_CODE,
        }))
    }

    async fn lookup_id(&self, addr: &FilAddress) -> SdkResult<FilAddress> {
        self.counters.chain_calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .read()
            .unwrap()
            .id_lookups
            .get(addr)
            .cloned()
            .ok_or_else(|| SdkError::rpc(1, format!("actor not found: {}", addr)))
    }
}

/// Builder for creating mock SDKs with specific chain state.
pub struct MockPoolsBuilder {
    state: MockState,
}

impl MockPoolsBuilder {
    pub fn new() -> Self {
        Self {
            state: MockState::default(),
        }
    }

    /// Register an actor with an explicit code CID.
    pub fn actor_code(mut self, addr: FilAddress, code: &str) -> Self {
        self.state.actor_codes.insert(addr, ActorCode::new(code));
        self
    }

    /// Register `addr` as an EVM actor.
    pub fn evm_actor(self, addr: FilAddress) -> Self {
        self.actor_code(addr, EVM_ACTOR_CODE)
    }

    /// Register `addr` as an EthAccount actor.
    pub fn eth_account(self, addr: FilAddress) -> Self {
        self.actor_code(addr, ETH_ACCOUNT_ACTOR_CODE)
    }

    /// Register `addr` as a plain account actor.
    pub fn account_actor(self, addr: FilAddress) -> Self {
        self.actor_code(addr, ACCOUNT_ACTOR_CODE)
    }

    /// Make `addr` resolve to the ID address `id`.
    pub fn id_lookup(mut self, addr: FilAddress, id: FilAddress) -> Self {
        self.state.id_lookups.insert(addr, id);
        self
    }

    /// Native balance of `addr`.
    pub fn balance(mut self, addr: EthAddress, atto: u128) -> Self {
        self.state.balances.insert(addr, atto);
        self
    }

    /// iFIL balance of `addr`.
    pub fn ifil_balance(mut self, addr: EthAddress, atto: u128) -> Self {
        self.state.ifil_balances.insert(addr, atto);
        self
    }

    /// Fail every act call with `msg`.
    pub fn act_failure(mut self, msg: &str) -> Self {
        self.state.act_failure = Some(msg.to_string());
        self
    }

    /// Fail every chain-client connection attempt with `msg`.
    pub fn connect_failure(mut self, msg: &str) -> Self {
        self.state.connect_failure = Some(msg.to_string());
        self
    }

    /// Report every receipt as reverted.
    pub fn reverting(mut self) -> Self {
        self.state.revert = true;
        self
    }

    pub fn build(self) -> MockPools {
        MockPools {
            state: Arc::new(RwLock::new(self.state)),
            counters: Arc::new(Counters::default()),
        }
    }
}

impl Default for MockPoolsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
