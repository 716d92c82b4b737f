//! Address, amount and role types for the GLIF Pools CLI.
//!
//! Users hand the CLI addresses in three shapes: Filecoin native strings
//! (`f0…`, `f1…`, `f410f…`), 0x-style EVM strings, or stored labels. This
//! crate owns the first two and the conversions between them. It performs
//! no I/O; ID lookups that need a chain node live in `glif-sdk`.
//!
//! # Module Organization
//!
//! - [`address`] - Filecoin native addresses
//! - [`eth`] - EVM addresses and conversions to/from native form
//! - [`amount`] - atto-denominated amounts
//! - [`role`] - agent key roles
//! - [`pool`] - pool names
//! - [`tx`] - transaction hashes
//!
//! # Example
//!
//! ```
//! use glif_types::{EthAddress, FilAddress, Network};
//!
//! let id: FilAddress = "f01234".parse().unwrap();
//! let masked = EthAddress::from_fil(&id).unwrap();
//! assert!(masked.is_masked_id());
//! assert_eq!(masked.to_fil(Network::Mainnet), id);
//! ```

pub mod account;
pub mod address;
pub mod amount;
pub mod error;
pub mod eth;
pub mod pool;
pub mod role;
pub mod tx;

pub use account::Account;
pub use address::{FilAddress, Network, Payload, Protocol, EAM_NAMESPACE};
pub use alloy_primitives::U256;
pub use amount::{format_fixed, parse_token_units, ATTO_PER_FIL};
pub use error::{TypesError, TypesResult};
pub use eth::EthAddress;
pub use pool::{parse_pool_type, PoolType};
pub use role::KeyRole;
pub use tx::TxHash;
