//! Signing accounts.

use std::fmt;

use crate::address::FilAddress;
use crate::eth::EthAddress;

/// An account that can sign on behalf of an agent.
///
/// EVM accounts live in the local encrypted keystore; native accounts are
/// held by a hardware wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Account {
    Eth(EthAddress),
    Fil(FilAddress),
}

impl Account {
    pub fn is_fil(&self) -> bool {
        matches!(self, Self::Fil(_))
    }

    pub fn eth_address(&self) -> Option<EthAddress> {
        match self {
            Self::Eth(addr) => Some(*addr),
            Self::Fil(_) => None,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eth(addr) => write!(f, "{}", addr),
            Self::Fil(addr) => write!(f, "{}", addr),
        }
    }
}
