//! Pre-migration plaintext key file (`keys.toml`).

use std::path::Path;

use glif_types::{EthAddress, KeyRole};

use crate::error::Result;
use crate::keystore::PrivateKey;
use crate::kv::TomlStore;

/// Hex-encoded private keys keyed by role name.
///
/// Read during `wallet migrate` and by the pre-flight checks; never written
/// by this crate.
#[derive(Debug, Clone)]
pub struct LegacyKeyStore {
    kv: TomlStore,
}

impl LegacyKeyStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            kv: TomlStore::open(path)?,
        })
    }

    /// Raw key material for `key`, or an empty string when unset.
    pub fn get(&self, key: &str) -> String {
        self.kv.get(key).unwrap_or_default().to_string()
    }

    /// Private key stored for `role`, if any.
    pub fn private_key(&self, role: KeyRole) -> Result<Option<PrivateKey>> {
        self.kv
            .get(role.as_str())
            .map(PrivateKey::from_hex)
            .transpose()
    }

    /// EVM address derived from the key stored for `role`, or
    /// [`EthAddress::ZERO`] when unset.
    pub fn get_addrs(&self, role: KeyRole) -> Result<EthAddress> {
        Ok(self
            .private_key(role)?
            .map(|key| key.address())
            .unwrap_or(EthAddress::ZERO))
    }

    /// Whether any required role still has plaintext key material.
    pub fn has_plaintext_keys(&self) -> bool {
        KeyRole::REQUIRED
            .iter()
            .any(|role| self.kv.contains(role.as_str()))
    }
}
