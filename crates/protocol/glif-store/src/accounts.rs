//! Labeled read-only accounts (`accounts.toml`).

use std::path::Path;

use glif_types::{EthAddress, FilAddress, Network};

use crate::error::{Result, StoreError};
use crate::kv::TomlStore;

/// Human-readable labels mapped to EVM addresses.
#[derive(Debug, Clone)]
pub struct AccountsStore {
    kv: TomlStore,
    network: Network,
}

impl AccountsStore {
    pub fn open(path: impl AsRef<Path>, network: Network) -> Result<Self> {
        Ok(Self {
            kv: TomlStore::open(path)?,
            network,
        })
    }

    /// Addresses labeled `name`.
    ///
    /// Returns [`StoreError::KeyNotFound`] when no such label exists.
    pub fn get_addrs(&self, name: &str) -> Result<(EthAddress, FilAddress)> {
        let raw = self
            .kv
            .get(name)
            .ok_or_else(|| StoreError::KeyNotFound(name.to_string()))?;
        let eth: EthAddress = raw.parse()?;
        Ok((eth, eth.to_fil(self.network)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kv.contains(name)
    }

    pub fn set(&mut self, name: impl Into<String>, addr: EthAddress) {
        self.kv.set(name, addr.to_checksum());
    }

    /// All labeled accounts in name order. Unparseable entries are skipped.
    pub fn accounts(&self) -> Vec<(String, EthAddress)> {
        self.kv
            .iter()
            .filter_map(|(name, raw)| raw.parse().ok().map(|addr| (name.to_string(), addr)))
            .collect()
    }

    pub fn save(&self) -> Result<()> {
        self.kv.save()
    }
}
