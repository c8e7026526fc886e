//! Distributes an asset to many recipients in confirmed batches.

use crate::config::{CliConfig, DistributionPlan};
use crate::errors::CliError;
use issuer_core::issue::{build_outputs, BatchReceipt, ChainClient, Transferer};
use issuer_core::{Codec, Keychain};
use issuer_network::ChainRpcClient;
use tracing::info;

/// Builds the plan's output batches and issues them through `client`.
pub async fn send<C: ChainClient + ?Sized>(
    client: &C,
    codec: &Codec,
    config: &CliConfig,
    plan: &DistributionPlan,
) -> Result<Vec<BatchReceipt>, CliError> {
    let keychain = Keychain::from_encoded(&plan.secret_keys)?;
    if keychain.is_empty() {
        return Err(CliError::InvalidPlan("no secret keys given".to_string()));
    }

    let batches = build_outputs(
        &plan.recipient_addresses()?,
        plan.outputs_per_address,
        plan.asset_id()?,
        plan.amount_per_output,
    )?;
    info!(
        "Distributing to {} recipients in {} batches",
        plan.recipients.len(),
        batches.len()
    );

    let transferer = Transferer::new(client, codec, &keychain, plan.transfer_config(config)?);
    Ok(transferer.send_outputs(&batches).await?)
}

/// Runs a distribution against the node at `endpoint`.
pub async fn run(
    endpoint: &str,
    codec: &Codec,
    config: &CliConfig,
    plan: &DistributionPlan,
) -> Result<Vec<BatchReceipt>, CliError> {
    let client = if plan.chain_alias == "P" {
        ChainRpcClient::platform(endpoint, config.api_timeout())?
    } else {
        ChainRpcClient::avm(endpoint, &plan.chain_alias, config.api_timeout())?
    };
    send(&client, codec, config, plan).await
}
