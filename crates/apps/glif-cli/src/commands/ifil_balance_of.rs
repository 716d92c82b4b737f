//! Query the iFIL balance of an address.

use glif_types::format_fixed;

use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{BalanceOutput, Render};
use crate::progress::with_spinner;
use crate::resolver::to_evm;

const DISPLAY_DECIMALS: u32 = 9;

/// Execute the ifil balance-of command.
pub async fn ifil_balance_of(ctx: &AppContext, address: &str) -> CliResult<String> {
    let evm = to_evm(ctx.sdk.as_ref(), address).await?;

    let balance = with_spinner(
        ctx.spinner("Fetching iFIL balance..."),
        ctx.sdk.query().ifil_balance_of(evm),
    )
    .await?;

    let output = BalanceOutput {
        address: address.to_string(),
        evm_address: evm.to_checksum(),
        balance_atto: balance.to_string(),
        balance: format_fixed(balance, DISPLAY_DECIMALS),
    };
    Ok(output.render(ctx.format))
}
