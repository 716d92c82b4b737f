//! Approve a spender for the agent's iFIL.

use glif_types::parse_token_units;
use tracing::info;

use crate::cli::AgentArgs;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{Render, TxOutput};
use crate::progress::with_spinner;
use crate::resolver::to_evm;
use crate::signer::owner_or_operator_setup;

/// Execute the ifil approve command.
///
/// `allowance` is a base-10 integer in atto-iFIL, up to `2^256 - 1`. `from` selects the
/// operator or owner; empty means the funded operator, else the owner.
pub async fn ifil_approve(
    ctx: &mut AppContext,
    spender: &str,
    allowance: &str,
    from: &str,
    agent: &AgentArgs,
) -> CliResult<String> {
    let allowance = parse_token_units(allowance)?;
    let setup = owner_or_operator_setup(ctx, from, agent.agent_addr.as_deref()).await?;
    let spender = to_evm(ctx.sdk.as_ref(), spender).await?;

    info!(%spender, %allowance, role = %setup.role, "Approving iFIL allowance");

    let receipt = with_spinner(ctx.spinner("Approving iFIL..."), async {
        let tx = ctx
            .sdk
            .act()
            .ifil_approve(spender, allowance, &setup.signer)
            .await?;
        ctx.sdk.query().state_wait_receipt(&tx).await
    })
    .await?;

    let output = TxOutput {
        message: "iFIL approved!".to_string(),
        tx_hash: receipt.tx_hash.to_string(),
        block_number: receipt.block_number,
    };
    Ok(output.render(ctx.format))
}
