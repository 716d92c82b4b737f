//! SDK boundary for the GLIF Pools CLI.
//!
//! The CLI never talks to the chain directly. It goes through [`PoolsSdk`],
//! which splits into mutating calls ([`Act`]), read-only queries ([`Query`])
//! and scoped chain-client connections ([`Extern`]).
//!
//! # Architecture
//!
//! ```text
//! glif-cli                      glif-sdk
//! ┌──────────────────┐         ┌──────────────────────────┐
//! │ command handlers │ ──────► │ PoolsSdk (trait)         │
//! │ address resolver │         │   ├─ MockPools           │
//! └──────────────────┘         │   └─ RemotePools         │
//!                              └────────────┬─────────────┘
//!                                           │ JSON-RPC
//!                                           ▼
//!                              ┌──────────────────────────┐
//!                              │ Lotus node               │
//!                              │ (Filecoin.* / eth_*)     │
//!                              └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use glif_sdk::{MockPools, PoolsSdk};
//! use glif_types::EthAddress;
//!
//! # async fn example() -> glif_sdk::SdkResult<()> {
//! let holder = EthAddress::from_id(1234);
//! let sdk = MockPools::builder().ifil_balance(holder, 5).build();
//! let balance = sdk.query().ifil_balance_of(holder).await?;
//! assert_eq!(balance, 5);
//! # Ok(())
//! # }
//! ```
//!
//! Mutating calls sign locally: [`KeystoreWallet`] unlocks a key from the
//! encrypted keystore and signs an EIP-1559 transaction, which the gateway
//! submits with `eth_sendRawTransaction`.

pub mod abi;
mod config;
mod error;
mod lotus;
pub mod mock;
mod remote;
mod retry;
pub mod rpc;
mod traits;
pub mod transaction;
pub mod types;
mod wallet;

pub use config::{ReceiptConfig, RetryConfig, SdkConfig, MAINNET_RPC_URL, TESTNET_RPC_URL};
pub use error::{SdkError, SdkResult};
pub use lotus::LotusClient;
pub use mock::{MockCall, MockPools, MockPoolsBuilder};
pub use remote::RemotePools;
pub use retry::RetryPolicy;
pub use traits::{Act, ChainClient, ChainConnection, Extern, PoolsSdk, Query};
pub use transaction::{sign_eip1559, TxEip1559};
pub use types::{ActorCode, BuiltinActor, Receipt};
pub use wallet::{KeystoreWallet, Signer, Wallet};
