//! Chain-facing value types shared by the SDK traits.

use std::fmt;

use glif_types::{EthAddress, TxHash};
use serde::{Deserialize, Serialize};

/// Builtin actors the address resolver needs to recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinActor {
    /// EVM smart-contract actor
    Evm,
    /// Externally owned Ethereum account
    EthAccount,
}

impl BuiltinActor {
    /// Key of this actor in the network's builtin-actor manifest.
    pub fn manifest_key(&self) -> &'static str {
        match self {
            Self::Evm => "evm",
            Self::EthAccount => "ethaccount",
        }
    }
}

impl fmt::Display for BuiltinActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.manifest_key())
    }
}

/// Actor code CID in its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorCode(pub String);

impl ActorCode {
    pub fn new(cid: impl Into<String>) -> Self {
        Self(cid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    /// Whether execution succeeded.
    pub success: bool,
    pub block_number: u64,
    pub gas_used: u64,
    /// Contract the transaction was sent to, if any.
    pub to: Option<EthAddress>,
}
