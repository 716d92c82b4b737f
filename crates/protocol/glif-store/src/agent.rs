//! Agent metadata and role addresses (`agent.toml`).

use std::path::Path;

use glif_types::{EthAddress, FilAddress, KeyRole, Network};
use tracing::debug;

use crate::error::Result;
use crate::kv::TomlStore;

/// Key holding the agent's EVM address.
pub const AGENT_ADDRESS_KEY: &str = "address";

/// Key holding the agent's numeric ID.
pub const AGENT_ID_KEY: &str = "id";

/// Stored agent address, agent ID and per-role signer addresses.
///
/// Each role is stored under two keys: `{role}` for the EVM address and
/// `{role}-f` for the native address. A role with only an EVM address
/// reports its delegated (`f410`) form as the native address.
#[derive(Debug, Clone)]
pub struct AgentStore {
    kv: TomlStore,
    network: Network,
}

impl AgentStore {
    /// Open `agent.toml` at `path`.
    pub fn open(path: impl AsRef<Path>, network: Network) -> Result<Self> {
        Ok(Self {
            kv: TomlStore::open(path)?,
            network,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Raw value for `key`, or an empty string when unset.
    pub fn get(&self, key: &str) -> String {
        self.kv.get(key).unwrap_or_default().to_string()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.kv.set(key, value);
    }

    pub fn save(&self) -> Result<()> {
        self.kv.save()
    }

    /// Addresses stored for `role`.
    ///
    /// Returns [`EthAddress::ZERO`] and `None` when the role is unset.
    pub fn get_addrs(&self, role: KeyRole) -> Result<(EthAddress, Option<FilAddress>)> {
        let eth = match self.kv.get(role.as_str()) {
            Some(s) => s.parse::<EthAddress>()?,
            None => EthAddress::ZERO,
        };
        let fil = match self.kv.get(&fil_key(role)) {
            Some(s) => Some(s.parse::<FilAddress>()?),
            None if !eth.is_zero() => Some(eth.to_fil(self.network)),
            None => None,
        };
        Ok((eth, fil))
    }

    /// Record the addresses for `role`. `None` leaves the stored value untouched.
    pub fn set_addrs(&mut self, role: KeyRole, eth: Option<EthAddress>, fil: Option<&FilAddress>) {
        if let Some(eth) = eth {
            self.kv.set(role.as_str(), eth.to_checksum());
        }
        if let Some(fil) = fil {
            self.kv.set(fil_key(role), fil.to_string());
        }
        debug!(role = %role, "Recorded role addresses");
    }

    /// Stored agent address, if any.
    pub fn agent_address(&self) -> Result<Option<EthAddress>> {
        self.kv
            .get(AGENT_ADDRESS_KEY)
            .map(str::parse::<EthAddress>)
            .transpose()
            .map_err(Into::into)
    }

    /// Stored agent ID, if any.
    pub fn agent_id(&self) -> Option<u64> {
        self.kv.get(AGENT_ID_KEY).and_then(|s| s.parse().ok())
    }

    pub fn set_agent_address(&mut self, addr: EthAddress) {
        self.kv.set(AGENT_ADDRESS_KEY, addr.to_checksum());
    }

    pub fn set_agent_id(&mut self, id: u64) {
        self.kv.set(AGENT_ID_KEY, id.to_string());
    }

    /// Whether `role` has previously been seen with a positive balance.
    pub fn is_funded_cached(&self, role: KeyRole) -> bool {
        self.kv.get(&funded_key(role)) == Some("true")
    }

    pub fn mark_funded(&mut self, role: KeyRole) {
        self.kv.set(funded_key(role), "true");
    }
}

fn fil_key(role: KeyRole) -> String {
    format!("{}-f", role.as_str())
}

fn funded_key(role: KeyRole) -> String {
    format!("{}-funded", role.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glif_types::Protocol;
    use tempfile::TempDir;

    fn eth(s: &str) -> EthAddress {
        s.parse().unwrap()
    }

    #[test]
    fn test_unset_role_is_zero() {
        let temp_dir = TempDir::new().unwrap();
        let store = AgentStore::open(temp_dir.path().join("agent.toml"), Network::Mainnet).unwrap();

        let (addr, fil) = store.get_addrs(KeyRole::Owner).unwrap();
        assert!(addr.is_zero());
        assert!(fil.is_none());
        assert_eq!(store.get("address"), "");
    }

    #[test]
    fn test_eth_role_derives_delegated_form() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("agent.toml");
        let operator = eth("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");

        let mut store = AgentStore::open(&path, Network::Mainnet).unwrap();
        store.set_addrs(KeyRole::Operator, Some(operator), None);
        store.save().unwrap();

        let store = AgentStore::open(&path, Network::Mainnet).unwrap();
        let (addr, fil) = store.get_addrs(KeyRole::Operator).unwrap();
        assert_eq!(addr, operator);
        assert_eq!(fil.unwrap().protocol(), Protocol::Delegated);
    }

    #[test]
    fn test_native_only_role() {
        let temp_dir = TempDir::new().unwrap();
        let mut store =
            AgentStore::open(temp_dir.path().join("agent.toml"), Network::Mainnet).unwrap();
        let native = FilAddress::new_secp256k1(Network::Mainnet, [7u8; 20]);
        store.set_addrs(KeyRole::Owner, None, Some(&native));

        let (addr, fil) = store.get_addrs(KeyRole::Owner).unwrap();
        assert!(addr.is_zero());
        assert_eq!(fil, Some(native));
    }

    #[test]
    fn test_agent_fields_and_funded_flag() {
        let temp_dir = TempDir::new().unwrap();
        let mut store =
            AgentStore::open(temp_dir.path().join("agent.toml"), Network::Mainnet).unwrap();
        assert!(store.agent_address().unwrap().is_none());
        assert!(store.agent_id().is_none());

        store.set_agent_address(EthAddress::from_id(42));
        store.set_agent_id(7);
        assert_eq!(store.agent_address().unwrap(), Some(EthAddress::from_id(42)));
        assert_eq!(store.agent_id(), Some(7));

        assert!(!store.is_funded_cached(KeyRole::Operator));
        store.mark_funded(KeyRole::Operator);
        assert!(store.is_funded_cached(KeyRole::Operator));
        assert_eq!(store.get("operator-funded"), "true");
    }

    #[test]
    fn test_corrupt_address_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut store =
            AgentStore::open(temp_dir.path().join("agent.toml"), Network::Mainnet).unwrap();
        store.set("owner", "not-an-address");
        assert!(store.get_addrs(KeyRole::Owner).is_err());
    }
}
