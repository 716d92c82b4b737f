//! Address resolution: user input to the form each SDK call expects.
//!
//! Input is a `0x` EVM address, a native Filecoin address or, where
//! allowed, an account label. ID addresses of EVM and EthAccount actors
//! are rejected: those actors must be addressed by their EVM form.

use glif_sdk::{BuiltinActor, ChainConnection, PoolsSdk};
use glif_store::AccountsStore;
use glif_types::{EthAddress, FilAddress, Network, Protocol};
use tracing::debug;

use crate::error::{CliError, CliResult};

fn is_evm_hex(input: &str) -> bool {
    input.starts_with("0x") || input.starts_with("0X")
}

/// Resolve `input` to an EVM address.
///
/// `0x` input is parsed without touching the chain.
pub async fn to_evm(sdk: &dyn PoolsSdk, input: &str) -> CliResult<EthAddress> {
    if is_evm_hex(input) {
        return Ok(input.parse()?);
    }

    let mut addr: FilAddress = input.parse()?;
    match addr.protocol() {
        Protocol::Delegated => {}
        Protocol::Id => {
            let client = sdk.extern_().connect_chain_client().await?;
            check_id_not_evm_actor(&client, &addr).await?;
        }
        _ => {
            let client = sdk.extern_().connect_chain_client().await?;
            addr = client.lookup_id(&addr).await?;
            debug!(input, id = %addr, "Looked up ID address");
        }
    }

    Ok(EthAddress::from_fil(&addr)?)
}

/// Resolve `input` to a native Filecoin address.
///
/// `0x` input becomes its `f0` (masked ID) or `f410` form on `network`.
pub async fn to_native(sdk: &dyn PoolsSdk, network: Network, input: &str) -> CliResult<FilAddress> {
    if is_evm_hex(input) {
        let eth: EthAddress = input.parse()?;
        return Ok(eth.to_fil(network));
    }

    let addr: FilAddress = input.parse()?;
    if addr.protocol() == Protocol::Id {
        let client = sdk.extern_().connect_chain_client().await?;
        check_id_not_evm_actor(&client, &addr).await?;
    }
    Ok(addr)
}

/// Resolve a miner address to its ID form.
pub async fn to_miner_id(sdk: &dyn PoolsSdk, input: &str) -> CliResult<FilAddress> {
    let addr: FilAddress = input.parse()?;
    if addr.protocol() == Protocol::Id {
        return Ok(addr);
    }

    let client = sdk.extern_().connect_chain_client().await?;
    Ok(client.lookup_id(&addr).await?)
}

/// Resolve an account label or an address to an EVM address.
pub async fn name_or_address_to_evm(
    sdk: &dyn PoolsSdk,
    accounts: &AccountsStore,
    input: &str,
) -> CliResult<EthAddress> {
    if accounts.contains(input) {
        let (eth, _) = accounts.get_addrs(input)?;
        debug!(label = input, address = %eth, "Resolved account label");
        return Ok(eth);
    }
    to_evm(sdk, input).await
}

/// Reject ID addresses that point at EVM or EthAccount actors.
async fn check_id_not_evm_actor(client: &ChainConnection, addr: &FilAddress) -> CliResult<()> {
    if addr.protocol() != Protocol::Id {
        return Ok(());
    }

    let code = client.actor_code(addr).await?;
    if code == client.builtin_actor_code(BuiltinActor::Evm).await? {
        return Err(CliError::validation(
            "Cant pass an ID address of an EVM actor",
        ));
    }
    if code == client.builtin_actor_code(BuiltinActor::EthAccount).await? {
        return Err(CliError::validation(
            "Cant pass an ID address of an Eth Account",
        ));
    }
    Ok(())
}
