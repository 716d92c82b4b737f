//! End-to-end CLI flows against the mock SDK.
//!
//! Each test starts from a fresh base directory holding a legacy
//! `keys.toml`, migrates it, then drives the command handlers the way
//! `main` does.

use std::fs;
use std::sync::Arc;

use glif_cli::cli::AgentArgs;
use glif_cli::{
    commands, AppContext, CliConfig, CliError, ErrorKind, OutputFormat, ScriptedPassphrases,
};
use glif_sdk::{MockCall, MockPools, MockPoolsBuilder};
use glif_store::PrivateKey;
use glif_types::{Account, EthAddress, FilAddress, KeyRole, Network, U256};
use tempfile::TempDir;

struct Wallet {
    owner: EthAddress,
    operator: EthAddress,
}

fn hex_key(key: &PrivateKey) -> String {
    key.to_bytes().iter().map(|b| format!("{:02x}", b)).collect()
}

fn write_legacy_keys(temp: &TempDir) -> Wallet {
    let owner = PrivateKey::generate();
    let operator = PrivateKey::generate();
    let request = PrivateKey::generate();
    fs::write(
        temp.path().join("keys.toml"),
        format!(
            "owner = \"{}\"\noperator = \"{}\"\nrequest = \"{}\"\n",
            hex_key(&owner),
            hex_key(&operator),
            hex_key(&request)
        ),
    )
    .unwrap();
    Wallet {
        owner: owner.address(),
        operator: operator.address(),
    }
}

fn context(temp: &TempDir, mock: &MockPools, format: OutputFormat) -> AppContext {
    let config = CliConfig::load(&temp.path().join("config.toml")).unwrap();
    let passphrases = ScriptedPassphrases::new()
        .with_env("GLIF_OWNER_PASSPHRASE", "correct horse")
        .with_env("GLIF_OPERATOR_PASSPHRASE", "battery staple");
    AppContext::with_sdk(config, format, Arc::new(mock.clone()))
        .unwrap()
        .with_passphrases(Arc::new(passphrases))
}

/// Legacy keys migrated and an agent stored; returns a fresh context.
async fn migrated(
    temp: &TempDir,
    setup: impl FnOnce(MockPoolsBuilder, &Wallet) -> MockPoolsBuilder,
) -> (AppContext, MockPools, Wallet) {
    let wallet = write_legacy_keys(temp);
    let mock = setup(MockPools::builder(), &wallet).build();

    let mut ctx = context(temp, &mock, OutputFormat::Human);
    commands::wallet_migrate(&mut ctx).unwrap();
    commands::agent_id(
        &mut ctx,
        Some("0xff00000000000000000000000000000000000064"),
        Some(9),
    )
    .await
    .unwrap();

    // Re-open from disk
    (context(temp, &mock, OutputFormat::Human), mock, wallet)
}

#[tokio::test]
async fn test_signing_blocked_until_migrated() {
    let temp = TempDir::new().unwrap();
    write_legacy_keys(&temp);
    let mock = MockPools::new();
    let mut ctx = context(&temp, &mock, OutputFormat::Human);

    let err = commands::confirm_worker(&mut ctx, "f01000", &AgentArgs::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::NotMigrated));
    assert_eq!(err.kind(), ErrorKind::Migration);
    assert_eq!(err.exit_code(), 1);
    assert!(err.hint().unwrap().contains("glif wallet migrate"));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_confirm_worker_after_migration() {
    let temp = TempDir::new().unwrap();
    let (mut ctx, mock, wallet) = migrated(&temp, |b, _| b).await;

    let out = commands::confirm_worker(&mut ctx, "f01000", &AgentArgs::default())
        .await
        .unwrap();
    assert_eq!(out, "Successfully confirmed worker change");

    assert_eq!(
        mock.calls()[0],
        MockCall::ConfirmWorker {
            agent: EthAddress::from_id(100),
            miner: FilAddress::new_id(Network::Mainnet, 1000),
            from: Account::Eth(wallet.owner),
        }
    );

    let events = ctx.journal.read_all().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].agent_id.as_deref(), Some("9"));
    assert_eq!(events[0].miner_id.as_deref(), Some("f01000"));
}

#[tokio::test]
async fn test_approve_switches_to_operator_once_funded() {
    let temp = TempDir::new().unwrap();
    let (mut ctx, mock, wallet) = migrated(&temp, |b, _| b).await;
    let spender = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    commands::ifil_approve(&mut ctx, spender, "250", "", &AgentArgs::default())
        .await
        .unwrap();

    // Unfunded operator: owner signs
    let signers: Vec<Account> = mock
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            MockCall::Approve { from, .. } => Some(from),
            _ => None,
        })
        .collect();
    assert_eq!(signers, vec![Account::Eth(wallet.owner)]);

    // Unknown addresses are rejected before any call
    let err = commands::ifil_approve(
        &mut ctx,
        spender,
        "250",
        "0x0000000000000000000000000000000000000001",
        &AgentArgs::default(),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "invalid from address");

    ctx.agent.mark_funded(KeyRole::Operator);
    commands::ifil_approve(
        &mut ctx,
        spender,
        "250",
        &wallet.operator.to_checksum(),
        &AgentArgs::default(),
    )
    .await
    .unwrap();
    assert!(mock.calls().contains(&MockCall::Approve {
        spender: spender.parse().unwrap(),
        allowance: U256::from(250u64),
        from: Account::Eth(wallet.operator),
    }));
}

#[tokio::test]
async fn test_label_then_query_balance() {
    let temp = TempDir::new().unwrap();
    let (mut ctx, _mock, wallet) = migrated(&temp, |b, w| {
        b.ifil_balance(w.operator, 42_000_000_000_000_000_000)
    })
    .await;

    let operator = wallet.operator.to_lower_hex();
    commands::label_account(&mut ctx, "ops", &operator).await.unwrap();

    let out = commands::ifil_balance_of(&ctx, &operator).await.unwrap();
    assert_eq!(out, format!("iFIL balance of {} is 42.000000000", operator));

    ctx.format = OutputFormat::Json;
    let list = commands::wallet_list(&ctx).unwrap();
    let json: serde_json::Value = serde_json::from_str(&list).unwrap();
    assert_eq!(json["accounts"][0]["name"], "ops");
    assert_eq!(json["accounts"][0]["evm_address"], wallet.operator.to_checksum());

    // keys.toml still holds the plaintext keys
    assert!(json["warning"]
        .as_str()
        .unwrap()
        .starts_with("unencrypted keys found"));
}

#[tokio::test]
async fn test_chain_failure_closes_connection() {
    let temp = TempDir::new().unwrap();
    let (ctx, mock, _) = migrated(&temp, |b, _| b).await;

    // f099 is unknown to the mock chain
    let err = commands::ifil_balance_of(&ctx, "f099").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::External);
    assert_eq!(mock.connections_opened(), mock.connections_closed());
}
