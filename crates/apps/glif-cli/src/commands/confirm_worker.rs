//! Confirm a miner's pending worker-address change.

use tracing::info;

use crate::cli::AgentArgs;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::journal::JournalEvent;
use crate::output::{Render, TxOutput};
use crate::progress::with_spinner;
use crate::resolver::to_miner_id;
use crate::signer::owner_setup;

/// Execute the confirm-worker command.
///
/// Signs as the owner. A journal event is written whether the call
/// succeeds or fails.
pub async fn confirm_worker(
    ctx: &mut AppContext,
    miner: &str,
    agent: &AgentArgs,
) -> CliResult<String> {
    let setup = owner_setup(ctx, agent.agent_addr.as_deref()).await?;
    let miner = to_miner_id(ctx.sdk.as_ref(), miner).await?;

    info!("Confirming worker address change for miner {}", miner);

    let agent_label = agent
        .agent_id
        .or_else(|| ctx.agent.agent_id())
        .map(|id| id.to_string())
        .unwrap_or_else(|| setup.agent.to_string());
    let mut event = JournalEvent::new("miner", "confirmworker")
        .agent_id(agent_label)
        .miner_id(&miner);

    let outcome = with_spinner(ctx.spinner("Confirming worker change..."), async {
        let tx = ctx
            .sdk
            .act()
            .agent_confirm_miner_worker_change(setup.agent, &miner, &setup.signer)
            .await?;
        event.set_tx(tx);
        ctx.sdk.query().state_wait_receipt(&tx).await
    })
    .await;

    if let Err(e) = &outcome {
        event.set_error(e);
    }
    ctx.journal.record(&event);
    let receipt = outcome?;

    let output = TxOutput {
        message: "Successfully confirmed worker change".to_string(),
        tx_hash: receipt.tx_hash.to_string(),
        block_number: receipt.block_number,
    };
    Ok(output.render(ctx.format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use crate::test_support::fixture;
    use glif_sdk::{MockCall, SdkError};
    use glif_types::{Account, FilAddress, Network};

    fn agent_args() -> AgentArgs {
        AgentArgs::default()
    }

    #[tokio::test]
    async fn test_confirm_worker_signs_as_owner() {
        let mut fx = fixture(|b, _| b);

        let out = confirm_worker(&mut fx.ctx, "f01234", &agent_args())
            .await
            .unwrap();
        assert_eq!(out, "Successfully confirmed worker change");

        let calls = fx.mock.calls();
        assert_eq!(
            calls[0],
            MockCall::ConfirmWorker {
                agent: fx.keys.agent,
                miner: FilAddress::new_id(Network::Mainnet, 1234),
                from: Account::Eth(fx.keys.owner),
            }
        );
        assert!(matches!(calls[1], MockCall::WaitReceipt(_)));

        let events = fx.ctx.journal.read_all().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "miner/confirmworker");
        assert_eq!(events[0].miner_id.as_deref(), Some("f01234"));
        assert!(events[0].tx.is_some());
        assert!(events[0].error.is_none());
    }

    #[tokio::test]
    async fn test_failure_is_journaled() {
        let mut fx = fixture(|b, _| b.act_failure("miner has no pending change"));

        let err = confirm_worker(&mut fx.ctx, "f01234", &agent_args())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Sdk(SdkError::Rpc { .. })));

        let events = fx.ctx.journal.read_all().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].tx.is_none());
        assert!(events[0]
            .error
            .as_deref()
            .unwrap()
            .contains("miner has no pending change"));
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_journaled_with_tx() {
        let mut fx = fixture(|b, _| b.reverting());

        let err = confirm_worker(&mut fx.ctx, "f01234", &agent_args())
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Sdk(SdkError::Reverted(_))));

        let events = fx.ctx.journal.read_all().unwrap();
        assert!(events[0].tx.is_some());
        assert!(events[0].error.is_some());
    }

    #[tokio::test]
    async fn test_agent_id_flag_labels_event() {
        let mut fx = fixture(|b, _| b);
        let args = AgentArgs {
            agent_addr: None,
            agent_id: Some(42),
        };

        confirm_worker(&mut fx.ctx, "f01234", &args).await.unwrap();
        let events = fx.ctx.journal.read_all().unwrap();
        assert_eq!(events[0].agent_id.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn test_bad_miner_makes_no_call() {
        let mut fx = fixture(|b, _| b);

        assert!(confirm_worker(&mut fx.ctx, "not-a-miner", &agent_args())
            .await
            .is_err());
        assert!(fx.mock.calls().is_empty());
        assert!(fx.ctx.journal.read_all().unwrap().is_empty());
    }
}
