//! Move plaintext role keys into the encrypted keystore.

use glif_types::KeyRole;
use tracing::{debug, info};

use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{MigrateOutput, MigratedKey, Render};

/// Execute the wallet migrate command.
///
/// Owner and operator keys are encrypted with a passphrase from the role's
/// environment variable or a confirmed prompt. The request key is stored
/// with the empty passphrase. Keys already in the keystore are skipped.
/// `keys.toml` is left untouched.
pub fn wallet_migrate(ctx: &mut AppContext) -> CliResult<String> {
    let mut migrated = Vec::new();

    for role in KeyRole::REQUIRED {
        let Some(key) = ctx.legacy_keys.private_key(role)? else {
            debug!(role = %role, "No legacy key to migrate");
            continue;
        };
        let address = key.address();

        let imported = if ctx.keystore.contains(&address) {
            info!(role = %role, %address, "Key already in keystore");
            false
        } else {
            let passphrase = migration_passphrase(ctx, role)?;
            ctx.keystore.import(&key, &passphrase)?;
            info!(role = %role, %address, "Imported key into keystore");
            true
        };

        ctx.agent.set_addrs(role, Some(address), None);
        migrated.push(MigratedKey {
            role: role.to_string(),
            address: address.to_checksum(),
            imported,
        });
    }

    if !migrated.is_empty() {
        ctx.agent.save()?;
    }

    let output = MigrateOutput {
        migrated,
        keystore: ctx.keystore.dir().display().to_string(),
    };
    Ok(output.render(ctx.format))
}

fn migration_passphrase(ctx: &AppContext, role: KeyRole) -> CliResult<String> {
    let Some(var) = role.passphrase_env() else {
        return Ok(String::new());
    };
    if let Some(passphrase) = ctx.passphrases.env(var) {
        debug!(var, "Using passphrase from environment");
        return Ok(passphrase);
    }
    Ok(ctx
        .passphrases
        .prompt_new(&format!("New {}", role.passphrase_prompt().to_lowercase()))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use crate::output::OutputFormat;
    use crate::preflight::check_wallet_migrated;
    use crate::prompt::ScriptedPassphrases;
    use glif_sdk::MockPools;
    use glif_store::PrivateKey;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn hex_key(key: &PrivateKey) -> String {
        key.to_bytes().iter().map(|b| format!("{:02x}", b)).collect()
    }

    struct Legacy {
        owner: PrivateKey,
        operator: PrivateKey,
        request: PrivateKey,
    }

    fn legacy_wallet(temp: &TempDir, source: ScriptedPassphrases) -> (AppContext, Legacy) {
        let legacy = Legacy {
            owner: PrivateKey::generate(),
            operator: PrivateKey::generate(),
            request: PrivateKey::generate(),
        };
        std::fs::write(
            temp.path().join("keys.toml"),
            format!(
                "owner = \"{}\"\noperator = \"{}\"\nrequest = \"{}\"\n",
                hex_key(&legacy.owner),
                hex_key(&legacy.operator),
                hex_key(&legacy.request)
            ),
        )
        .unwrap();

        let config = CliConfig::load(&temp.path().join("config.toml")).unwrap();
        let ctx = AppContext::with_sdk(config, OutputFormat::Json, Arc::new(MockPools::new()))
            .unwrap()
            .with_passphrases(Arc::new(source));
        (ctx, legacy)
    }

    #[test]
    fn test_migrate_imports_all_roles() {
        let temp = TempDir::new().unwrap();
        let source = ScriptedPassphrases::new()
            .with_env("GLIF_OWNER_PASSPHRASE", "o")
            .with_env("GLIF_OPERATOR_PASSPHRASE", "p");
        let (mut ctx, legacy) = legacy_wallet(&temp, source);

        assert!(check_wallet_migrated(&ctx.agent, &ctx.legacy_keys).is_err());

        let out = wallet_migrate(&mut ctx).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["migrated"].as_array().unwrap().len(), 3);
        assert_eq!(json["migrated"][0]["imported"], true);

        check_wallet_migrated(&ctx.agent, &ctx.legacy_keys).unwrap();
        assert!(ctx.keystore.can_unlock(&legacy.owner.address(), "o"));
        assert!(ctx.keystore.can_unlock(&legacy.operator.address(), "p"));
        assert!(ctx.keystore.can_unlock(&legacy.request.address(), ""));

        let (owner, _) = ctx.agent.get_addrs(KeyRole::Owner).unwrap();
        assert_eq!(owner, legacy.owner.address());
    }

    #[test]
    fn test_migrate_prompts_without_env() {
        let temp = TempDir::new().unwrap();
        let source = Arc::new(
            ScriptedPassphrases::new()
                .with_answer("typed-owner")
                .with_answer("typed-operator"),
        );
        let (ctx, legacy) = legacy_wallet(&temp, ScriptedPassphrases::new());
        let mut ctx = ctx.with_passphrases(source.clone());

        wallet_migrate(&mut ctx).unwrap();
        assert_eq!(
            source.asked(),
            vec!["New owner key passphrase", "New operator key passphrase"]
        );
        assert!(ctx.keystore.can_unlock(&legacy.owner.address(), "typed-owner"));
        assert!(ctx
            .keystore
            .can_unlock(&legacy.operator.address(), "typed-operator"));
    }

    #[test]
    fn test_migrate_twice_skips_existing() {
        let temp = TempDir::new().unwrap();
        let source = ScriptedPassphrases::new()
            .with_env("GLIF_OWNER_PASSPHRASE", "o")
            .with_env("GLIF_OPERATOR_PASSPHRASE", "p");
        let (mut ctx, _) = legacy_wallet(&temp, source);

        wallet_migrate(&mut ctx).unwrap();
        let out = wallet_migrate(&mut ctx).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(json["migrated"]
            .as_array()
            .unwrap()
            .iter()
            .all(|k| k["imported"] == false));
        assert_eq!(ctx.keystore.accounts().unwrap().len(), 3);
    }

    #[test]
    fn test_nothing_to_migrate() {
        let temp = TempDir::new().unwrap();
        let config = CliConfig::load(&temp.path().join("config.toml")).unwrap();
        let mut ctx =
            AppContext::with_sdk(config, OutputFormat::Human, Arc::new(MockPools::new())).unwrap();

        let out = wallet_migrate(&mut ctx).unwrap();
        assert_eq!(out, "No plaintext keys found in keys.toml");
        assert!(!temp.path().join("agent.toml").exists());
    }
}
