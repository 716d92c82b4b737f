//! Shared fixtures for unit tests.

use std::sync::Arc;

use glif_sdk::{MockPools, MockPoolsBuilder};
use glif_store::{KeyStore, PrivateKey};
use glif_types::{EthAddress, KeyRole};
use tempfile::TempDir;

use crate::config::CliConfig;
use crate::context::AppContext;
use crate::output::OutputFormat;
use crate::prompt::ScriptedPassphrases;

pub const OWNER_PASS: &str = "owner-pass";
pub const OPERATOR_PASS: &str = "operator-pass";

/// Addresses of the migrated role keys.
pub struct Keys {
    pub owner: EthAddress,
    pub operator: EthAddress,
    pub request: EthAddress,
    pub agent: EthAddress,
}

pub struct Fixture {
    pub temp: TempDir,
    pub ctx: AppContext,
    pub mock: MockPools,
    pub keys: Keys,
}

/// A migrated wallet in a temp dir: owner and operator keys encrypted
/// (passphrases in the scripted env), request key unencrypted, agent set.
pub fn fixture(setup: impl FnOnce(MockPoolsBuilder, &Keys) -> MockPoolsBuilder) -> Fixture {
    let temp = TempDir::new().unwrap();
    let config = CliConfig::load(&temp.path().join("config.toml")).unwrap();

    let keystore = KeyStore::open(config.keystore_dir()).unwrap();
    let keys = Keys {
        owner: keystore.import(&PrivateKey::generate(), OWNER_PASS).unwrap(),
        operator: keystore
            .import(&PrivateKey::generate(), OPERATOR_PASS)
            .unwrap(),
        request: keystore.import(&PrivateKey::generate(), "").unwrap(),
        agent: PrivateKey::generate().address(),
    };

    let mock = setup(MockPools::builder(), &keys).build();
    let passphrases = ScriptedPassphrases::new()
        .with_env("GLIF_OWNER_PASSPHRASE", OWNER_PASS)
        .with_env("GLIF_OPERATOR_PASSPHRASE", OPERATOR_PASS);
    let mut ctx = AppContext::with_sdk(config, OutputFormat::Human, Arc::new(mock.clone()))
        .unwrap()
        .with_passphrases(Arc::new(passphrases));

    ctx.agent.set_addrs(KeyRole::Owner, Some(keys.owner), None);
    ctx.agent.set_addrs(KeyRole::Operator, Some(keys.operator), None);
    ctx.agent.set_addrs(KeyRole::Request, Some(keys.request), None);
    ctx.agent.set_agent_address(keys.agent);
    ctx.agent.save().unwrap();

    Fixture {
        temp,
        ctx,
        mock,
        keys,
    }
}
