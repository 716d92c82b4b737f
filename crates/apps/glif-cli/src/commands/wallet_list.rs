//! List agent role keys and labeled accounts.

use glif_types::KeyRole;

use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{LabelEntry, Render, RoleEntry, WalletListOutput};
use crate::preflight::check_unencrypted_private_keys;

const LISTED_ROLES: [KeyRole; 5] = [
    KeyRole::Owner,
    KeyRole::Operator,
    KeyRole::Request,
    KeyRole::OwnerProposer,
    KeyRole::OwnerApprover,
];

/// Execute the wallet list command.
pub fn wallet_list(ctx: &AppContext) -> CliResult<String> {
    let mut roles = Vec::with_capacity(LISTED_ROLES.len());
    for role in LISTED_ROLES {
        let (eth, fil) = ctx.agent.get_addrs(role)?;
        roles.push(RoleEntry {
            role: role.to_string(),
            evm_address: (!eth.is_zero()).then(|| eth.to_checksum()),
            native_address: fil.map(|f| f.to_string()),
        });
    }

    let accounts = ctx
        .accounts
        .accounts()
        .into_iter()
        .map(|(name, eth)| LabelEntry {
            name,
            evm_address: eth.to_checksum(),
            native_address: eth.to_fil(ctx.network).to_string(),
        })
        .collect();

    let warning = check_unencrypted_private_keys(&ctx.legacy_keys)
        .err()
        .map(|e| e.to_string());

    let output = WalletListOutput {
        roles,
        accounts,
        warning,
    };
    Ok(output.render(ctx.format))
}
