//! Label a read-only account.

use tracing::info;

use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::output::{LabelOutput, Render};
use crate::resolver::name_or_address_to_evm;

/// Execute the wallet label-account command.
///
/// `address` may itself be an existing label.
pub async fn label_account(ctx: &mut AppContext, name: &str, address: &str) -> CliResult<String> {
    if ctx.accounts.contains(name) {
        return Err(CliError::validation(format!(
            "{} account already created",
            name
        )));
    }

    let evm = name_or_address_to_evm(ctx.sdk.as_ref(), &ctx.accounts, address).await?;
    let checksum = evm.to_checksum();
    if checksum != address {
        info!("Transforming {} into its EVM representation: {}", address, checksum);
    }

    ctx.accounts.set(name, evm);
    ctx.accounts.save()?;

    let output = LabelOutput {
        name: name.to_string(),
        address: checksum,
    };
    Ok(output.render(ctx.format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::fixture;
    use glif_store::AccountsStore;
    use glif_types::{EthAddress, FilAddress, Network};

    #[tokio::test]
    async fn test_label_evm_address() {
        let mut fx = fixture(|b, _| b);
        let addr = fx.keys.owner.to_lower_hex();

        let out = label_account(&mut fx.ctx, "savings", &addr).await.unwrap();
        assert!(out.ends_with(&fx.keys.owner.to_checksum()));

        // Persisted
        let reopened =
            AccountsStore::open(fx.ctx.config.accounts_path(), Network::Mainnet).unwrap();
        let (eth, fil) = reopened.get_addrs("savings").unwrap();
        assert_eq!(eth, fx.keys.owner);
        assert_eq!(fil, fx.keys.owner.to_fil(Network::Mainnet));
    }

    #[tokio::test]
    async fn test_label_native_id() {
        let id = FilAddress::new_id(Network::Mainnet, 77);
        let mut fx = fixture(|b, _| b.account_actor(id.clone()));

        label_account(&mut fx.ctx, "miner-owner", "f077").await.unwrap();
        let (eth, _) = fx.ctx.accounts.get_addrs("miner-owner").unwrap();
        assert_eq!(eth, EthAddress::from_id(77));
    }

    #[tokio::test]
    async fn test_label_from_existing_label() {
        let mut fx = fixture(|b, _| b);
        label_account(&mut fx.ctx, "a", &fx.keys.operator.to_checksum())
            .await
            .unwrap();

        label_account(&mut fx.ctx, "b", "a").await.unwrap();
        let (eth, _) = fx.ctx.accounts.get_addrs("b").unwrap();
        assert_eq!(eth, fx.keys.operator);
        assert_eq!(fx.mock.connections_opened(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_label_rejected() {
        let mut fx = fixture(|b, _| b);
        let addr = fx.keys.owner.to_checksum();
        label_account(&mut fx.ctx, "savings", &addr).await.unwrap();

        let err = label_account(&mut fx.ctx, "savings", "garbage")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "savings account already created");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unparseable_address_not_saved() {
        let mut fx = fixture(|b, _| b);

        assert!(label_account(&mut fx.ctx, "x", "nonsense").await.is_err());
        assert!(!fx.ctx.accounts.contains("x"));
    }
}
