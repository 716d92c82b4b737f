//! Show or set the stored agent address and ID.

use tracing::info;

use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{AgentOutput, Render};
use crate::resolver::to_evm;

/// Execute the agent id command.
///
/// With no flags this only reports what `agent.toml` holds.
pub async fn agent_id(
    ctx: &mut AppContext,
    address: Option<&str>,
    id: Option<u64>,
) -> CliResult<String> {
    let updated = address.is_some() || id.is_some();

    if let Some(address) = address {
        let evm = to_evm(ctx.sdk.as_ref(), address).await?;
        info!(agent = %evm, "Storing agent address");
        ctx.agent.set_agent_address(evm);
    }
    if let Some(id) = id {
        info!(id, "Storing agent ID");
        ctx.agent.set_agent_id(id);
    }
    if updated {
        ctx.agent.save()?;
    }

    let address = ctx.agent.agent_address()?;
    let output = AgentOutput {
        address: address.map(|a| a.to_checksum()),
        native_address: address.map(|a| a.to_fil(ctx.network).to_string()),
        id: ctx.agent.agent_id(),
        updated,
    };
    Ok(output.render(ctx.format))
}
