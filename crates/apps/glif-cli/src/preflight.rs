//! Checks run before any signing operation.

use glif_store::{AgentStore, LegacyKeyStore};
use glif_types::KeyRole;

use crate::error::{CliError, CliResult};

/// Verify every required role has an address in `agent.toml`.
///
/// A role missing there but present in `keys.toml` has not been migrated;
/// a role missing from both is reported by name.
pub fn check_wallet_migrated(agent: &AgentStore, legacy: &LegacyKeyStore) -> CliResult<()> {
    for role in KeyRole::REQUIRED {
        let (eth, fil) = agent.get_addrs(role)?;
        if eth.is_zero() && fil.is_none() {
            let old = legacy.get_addrs(role)?;
            if old.is_zero() {
                return Err(CliError::MissingKey(role));
            }
            return Err(CliError::NotMigrated);
        }
    }
    Ok(())
}

/// Fail when plaintext private keys are still present in `keys.toml`.
pub fn check_unencrypted_private_keys(legacy: &LegacyKeyStore) -> CliResult<()> {
    for role in KeyRole::REQUIRED {
        if !legacy.get(role.as_str()).is_empty() {
            return Err(CliError::UnencryptedKeys);
        }
    }
    Ok(())
}
