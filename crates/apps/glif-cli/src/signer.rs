//! Choosing which role signs a call, and unlocking its key.

use std::sync::Arc;

use glif_sdk::{KeystoreWallet, SdkError, Signer};
use glif_store::{KeyStore, PrivateKey};
use glif_types::{Account, EthAddress, FilAddress, KeyRole, Protocol};
use tracing::{debug, info};

use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::preflight::check_wallet_migrated;
use crate::prompt::PassphraseSource;

const NO_AGENT: &str = "Did you forget to create your agent or specify an address? Try `glif agent id --address <address>`";

/// A resolved signer plus the agent it acts for.
#[derive(Debug)]
pub struct SignerSetup {
    pub agent: EthAddress,
    pub role: KeyRole,
    pub signer: Signer,
}

/// Agent address from `--agent-addr`, else from `agent.toml`.
pub fn agent_address(ctx: &AppContext, agent_override: Option<&str>) -> CliResult<EthAddress> {
    if let Some(addr) = agent_override {
        return Ok(addr.parse()?);
    }
    ctx.agent
        .agent_address()?
        .ok_or_else(|| CliError::validation(NO_AGENT))
}

/// Whether `from` names the role with addresses `eth`/`fil`.
fn names_role(from: &str, eth: &EthAddress, fil: Option<&FilAddress>) -> bool {
    (!eth.is_zero() && eth.matches_str(from))
        || fil.is_some_and(|fil| fil.to_string() == from)
}

/// Owner account: EVM when the native form is delegated (or unknown).
fn owner_account(eth: EthAddress, fil: Option<FilAddress>) -> Account {
    match fil {
        Some(fil) if fil.protocol() != Protocol::Delegated => Account::Fil(fil),
        _ => Account::Eth(eth),
    }
}

/// Funding check, cached per role in `agent.toml` once positive.
pub async fn is_funded(ctx: &mut AppContext, role: KeyRole, addr: EthAddress) -> CliResult<bool> {
    if ctx.agent.is_funded_cached(role) {
        return Ok(true);
    }
    if addr.is_zero() {
        return Ok(false);
    }

    let balance = ctx.sdk.query().balance(addr).await?;
    debug!(role = %role, address = %addr, balance, "Checked role balance");
    if balance == 0 {
        return Ok(false);
    }

    ctx.agent.mark_funded(role);
    ctx.agent.save()?;
    Ok(true)
}

/// Passphrase for `addr`: role env var, then the empty passphrase, then a prompt.
pub fn obtain_passphrase(
    keystore: &KeyStore,
    source: &dyn PassphraseSource,
    role: KeyRole,
    addr: &EthAddress,
) -> CliResult<String> {
    if let Some(var) = role.passphrase_env() {
        if let Some(passphrase) = source.env(var) {
            debug!(var, "Using passphrase from environment");
            return Ok(passphrase);
        }
    }

    if keystore.can_unlock(addr, "") {
        return Ok(String::new());
    }

    let passphrase = source.prompt(&role.passphrase_prompt())?;
    if passphrase.is_empty() {
        return Err(CliError::Aborted);
    }
    Ok(passphrase)
}

/// Request key, decrypted with the empty passphrase.
///
/// A missing or passphrase-locked request key fails here, before any role
/// is selected or queried.
pub fn request_key(ctx: &AppContext) -> CliResult<PrivateKey> {
    let (addr, _) = ctx.agent.get_addrs(KeyRole::Request)?;
    if addr.is_zero() {
        return Err(CliError::MissingKey(KeyRole::Request));
    }
    let key = ctx.keystore.unlock(&addr, "")?;
    debug!(request = %addr, "Unlocked request key");
    Ok(key)
}

/// Pick the operator or owner to sign, based on `from`.
///
/// Empty `from` or the operator's address selects the operator when it is
/// funded and falls back to the owner otherwise. The owner's address
/// selects the owner. Anything else is rejected.
pub async fn owner_or_operator_setup(
    ctx: &mut AppContext,
    from: &str,
    agent_override: Option<&str>,
) -> CliResult<SignerSetup> {
    check_wallet_migrated(&ctx.agent, &ctx.legacy_keys)?;
    request_key(ctx)?;

    let (op_evm, op_fil) = ctx.agent.get_addrs(KeyRole::Operator)?;
    let (_, proposer) = ctx.agent.get_addrs(KeyRole::OwnerProposer)?;
    let (_, approver) = ctx.agent.get_addrs(KeyRole::OwnerApprover)?;
    let (ow_evm, ow_fil) = ctx.agent.get_addrs(KeyRole::Owner)?;

    let (role, account) = if from.is_empty() || names_role(from, &op_evm, op_fil.as_ref()) {
        if is_funded(ctx, KeyRole::Operator, op_evm).await? {
            info!(address = %op_evm, "Signing with operator address");
            (KeyRole::Operator, Account::Eth(op_evm))
        } else {
            info!("operator not funded, falling back to owner address");
            (KeyRole::Owner, owner_account(ow_evm, ow_fil))
        }
    } else if names_role(from, &ow_evm, ow_fil.as_ref()) {
        info!("Signing with owner address");
        (KeyRole::Owner, owner_account(ow_evm, ow_fil))
    } else {
        return Err(CliError::validation("invalid from address"));
    };

    let agent = agent_address(ctx, agent_override)?;

    if matches!(account, Account::Fil(_)) && (proposer.is_some() || approver.is_some()) {
        return Err(SdkError::MultisigOwner.into());
    }
    let wallet = KeystoreWallet::find(&ctx.keystore, &account)?;
    let passphrase = match &account {
        Account::Eth(addr) => {
            obtain_passphrase(&ctx.keystore, ctx.passphrases.as_ref(), role, addr)?
        }
        Account::Fil(_) => String::new(),
    };

    let mut signer = Signer::new(Arc::new(wallet), passphrase);
    signer.proposer = proposer;
    signer.approver = approver;

    Ok(SignerSetup {
        agent,
        role,
        signer,
    })
}

/// Owner-only setup: selects the owner by its native address.
pub async fn owner_setup(
    ctx: &mut AppContext,
    agent_override: Option<&str>,
) -> CliResult<SignerSetup> {
    let (_, ow_fil) = ctx.agent.get_addrs(KeyRole::Owner)?;
    let from = ow_fil.map(|f| f.to_string()).unwrap_or_default();
    if from.is_empty() {
        // No owner at all; let the migration check name the problem
        check_wallet_migrated(&ctx.agent, &ctx.legacy_keys)?;
        return Err(CliError::MissingKey(KeyRole::Owner));
    }
    owner_or_operator_setup(ctx, &from, agent_override).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::prompt::ScriptedPassphrases;
    use crate::test_support::fixture;
    use glif_sdk::MockCall;
    use glif_store::StoreError;
    use glif_types::Network;

    #[tokio::test]
    async fn test_empty_from_prefers_funded_operator() {
        let mut fx = fixture(|b, k| b.balance(k.operator, 5));

        let setup = owner_or_operator_setup(&mut fx.ctx, "", None).await.unwrap();
        assert_eq!(setup.role, KeyRole::Operator);
        assert_eq!(setup.signer.account(), &Account::Eth(fx.keys.operator));
        assert_eq!(setup.signer.passphrase, "operator-pass");
        assert_eq!(setup.agent, fx.keys.agent);
        assert!(fx.mock.calls().contains(&MockCall::Balance(fx.keys.operator)));

        // Positive balance is cached
        assert!(fx.ctx.agent.is_funded_cached(KeyRole::Operator));
    }

    #[tokio::test]
    async fn test_empty_from_falls_back_to_owner() {
        let mut fx = fixture(|b, _| b);

        let setup = owner_or_operator_setup(&mut fx.ctx, "", None).await.unwrap();
        assert_eq!(setup.role, KeyRole::Owner);
        assert_eq!(setup.signer.account(), &Account::Eth(fx.keys.owner));
        assert_eq!(setup.signer.passphrase, "owner-pass");
        assert!(!fx.ctx.agent.is_funded_cached(KeyRole::Operator));
    }

    #[tokio::test]
    async fn test_cached_funding_skips_balance_query() {
        let mut fx = fixture(|b, _| b);
        fx.ctx.agent.mark_funded(KeyRole::Operator);

        let setup = owner_or_operator_setup(&mut fx.ctx, "", None).await.unwrap();
        assert_eq!(setup.role, KeyRole::Operator);
        assert!(fx.mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_operator_address_any_case() {
        let mut fx = fixture(|b, k| b.balance(k.operator, 1));

        let upper = format!("0x{}", &fx.keys.operator.to_lower_hex()[2..].to_uppercase());
        let setup = owner_or_operator_setup(&mut fx.ctx, &upper, None).await.unwrap();
        assert_eq!(setup.role, KeyRole::Operator);

        let native = fx.keys.operator.to_fil(Network::Mainnet).to_string();
        let setup = owner_or_operator_setup(&mut fx.ctx, &native, None).await.unwrap();
        assert_eq!(setup.role, KeyRole::Operator);
    }

    #[tokio::test]
    async fn test_owner_delegated_form_uses_evm_account() {
        let mut fx = fixture(|b, _| b);

        let f410 = fx.keys.owner.to_fil(Network::Mainnet).to_string();
        let setup = owner_or_operator_setup(&mut fx.ctx, &f410, None).await.unwrap();
        assert_eq!(setup.role, KeyRole::Owner);
        assert_eq!(setup.signer.account(), &Account::Eth(fx.keys.owner));

        let setup = owner_or_operator_setup(&mut fx.ctx, &fx.keys.owner.to_lower_hex(), None)
            .await
            .unwrap();
        assert_eq!(setup.signer.account(), &Account::Eth(fx.keys.owner));
    }

    #[tokio::test]
    async fn test_native_owner_needs_ledger() {
        let mut fx = fixture(|b, _| b);
        let native = FilAddress::new_secp256k1(Network::Mainnet, [4u8; 20]);
        fx.ctx.agent.set_addrs(KeyRole::Owner, None, Some(&native));

        let err = owner_or_operator_setup(&mut fx.ctx, &native.to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Sdk(SdkError::LedgerNotFound)));
        assert_eq!(err.to_string(), "Ledger not found");
    }

    #[tokio::test]
    async fn test_native_multisig_owner_rejected() {
        let mut fx = fixture(|b, _| b);
        let native = FilAddress::new_secp256k1(Network::Mainnet, [4u8; 20]);
        fx.ctx.agent.set_addrs(KeyRole::Owner, None, Some(&native));
        let proposer = FilAddress::new_id(Network::Mainnet, 11);
        fx.ctx.agent.set_addrs(KeyRole::OwnerProposer, None, Some(&proposer));

        let err = owner_setup(&mut fx.ctx, None).await.unwrap_err();
        assert!(matches!(err, CliError::Sdk(SdkError::MultisigOwner)));
        assert_eq!(err.kind(), ErrorKind::External);
        assert!(err.hint().unwrap().contains("single-signer"));
    }

    #[tokio::test]
    async fn test_locked_request_key_fails_early() {
        let mut fx = fixture(|b, k| b.balance(k.operator, 5));
        let locked = fx
            .ctx
            .keystore
            .import(&PrivateKey::generate(), "not-empty")
            .unwrap();
        fx.ctx.agent.set_addrs(KeyRole::Request, Some(locked), None);

        let err = owner_or_operator_setup(&mut fx.ctx, "", None)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Store(StoreError::Encryption(_))));
        // No funding query was made
        assert!(fx.mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_request_key_missing_from_keystore() {
        let mut fx = fixture(|b, _| b);
        let absent = PrivateKey::generate().address();
        fx.ctx.agent.set_addrs(KeyRole::Request, Some(absent), None);

        let err = owner_setup(&mut fx.ctx, None).await.unwrap_err();
        assert!(matches!(err, CliError::Store(StoreError::KeyNotFound(_))));
    }

    #[test]
    fn test_request_key_unlocks_with_empty_passphrase() {
        let fx = fixture(|b, _| b);
        let key = request_key(&fx.ctx).unwrap();
        assert_eq!(key.address(), fx.keys.request);
    }

    #[tokio::test]
    async fn test_unknown_from_is_rejected() {
        let mut fx = fixture(|b, _| b);

        let stranger = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        let err = owner_or_operator_setup(&mut fx.ctx, stranger, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid from address");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_missing_agent_address() {
        let mut fx = fixture(|b, _| b);
        fx.ctx.agent.set(glif_store::AGENT_ADDRESS_KEY, "");

        let err = owner_or_operator_setup(&mut fx.ctx, "", None).await.unwrap_err();
        assert!(err.to_string().starts_with("Did you forget to create your agent"));

        let other = "0xff00000000000000000000000000000000000064";
        let setup = owner_or_operator_setup(&mut fx.ctx, "", Some(other)).await.unwrap();
        assert_eq!(setup.agent, EthAddress::from_id(100));
    }

    #[tokio::test]
    async fn test_proposer_and_approver_carried() {
        let mut fx = fixture(|b, _| b);
        let proposer = FilAddress::new_id(Network::Mainnet, 11);
        let approver = FilAddress::new_id(Network::Mainnet, 12);
        fx.ctx.agent.set_addrs(KeyRole::OwnerProposer, None, Some(&proposer));
        fx.ctx.agent.set_addrs(KeyRole::OwnerApprover, None, Some(&approver));

        let setup = owner_setup(&mut fx.ctx, None).await.unwrap();
        assert_eq!(setup.role, KeyRole::Owner);
        assert_eq!(setup.signer.proposer, Some(proposer));
        assert_eq!(setup.signer.approver, Some(approver));
    }

    #[tokio::test]
    async fn test_passphrase_prompt_when_env_unset() {
        let mut fx = fixture(|b, _| b);
        let source = Arc::new(ScriptedPassphrases::new().with_answer("owner-pass"));
        fx.ctx.passphrases = source.clone();

        let setup = owner_setup(&mut fx.ctx, None).await.unwrap();
        assert_eq!(setup.signer.passphrase, "owner-pass");
        assert_eq!(source.asked(), vec!["Owner key passphrase"]);
    }

    #[tokio::test]
    async fn test_empty_prompt_aborts() {
        let mut fx = fixture(|b, _| b);
        fx.ctx.passphrases = Arc::new(ScriptedPassphrases::new());

        let err = owner_setup(&mut fx.ctx, None).await.unwrap_err();
        assert!(matches!(err, CliError::Aborted));
    }

    #[test]
    fn test_empty_passphrase_key_skips_prompt() {
        let fx = fixture(|b, _| b);
        let source = ScriptedPassphrases::new();

        // The request key is stored without a passphrase
        let passphrase =
            obtain_passphrase(&fx.ctx.keystore, &source, KeyRole::Request, &fx.keys.request).unwrap();
        assert_eq!(passphrase, "");
        assert!(source.asked().is_empty());
    }

    #[test]
    fn test_env_wins_over_prompt() {
        let fx = fixture(|b, _| b);
        let source = ScriptedPassphrases::new()
            .with_env("GLIF_OPERATOR_PASSPHRASE", "from-env")
            .with_answer("typed");

        let passphrase =
            obtain_passphrase(&fx.ctx.keystore, &source, KeyRole::Operator, &fx.keys.operator).unwrap();
        assert_eq!(passphrase, "from-env");
        assert!(source.asked().is_empty());
    }

    #[tokio::test]
    async fn test_unmigrated_wallet_blocks_setup() {
        let mut fx = fixture(|b, _| b);
        fx.ctx.agent.set(KeyRole::Request.as_str(), "");
        fx.ctx.agent.set("request-f", "");
        std::fs::write(
            fx.temp.path().join("keys.toml"),
            "request = \"ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80\"\n",
        )
        .unwrap();
        fx.ctx.legacy_keys =
            glif_store::LegacyKeyStore::open(fx.temp.path().join("keys.toml")).unwrap();

        let err = owner_or_operator_setup(&mut fx.ctx, "", None).await.unwrap_err();
        assert!(matches!(err, CliError::NotMigrated));
    }
}
