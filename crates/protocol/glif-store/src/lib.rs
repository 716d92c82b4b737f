//! Local storage for the GLIF Pools CLI.
//!
//! All state lives in plain files under the base directory:
//!
//! ```text
//! ~/.glif/
//! ├── agent.toml       # Agent address/id, role addresses, funded flags
//! ├── accounts.toml    # Labeled read-only accounts
//! ├── keys.toml        # Legacy plaintext keys (pre-migration)
//! └── keystore/
//!     └── {address}.json   # Encrypted secp256k1 keys
//! ```
//!
//! The TOML stores are flat string tables. Nothing is written until
//! `save()` is called.

pub mod accounts;
pub mod agent;
pub mod error;
pub mod keystore;
pub mod kv;
pub mod legacy;

pub use accounts::AccountsStore;
pub use agent::{AgentStore, AGENT_ADDRESS_KEY, AGENT_ID_KEY};
pub use error::{Result, StoreError};
pub use keystore::{KeyStore, PrivateKey};
pub use kv::TomlStore;
pub use legacy::LegacyKeyStore;
