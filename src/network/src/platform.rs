//! Platform-chain queries used by the validator and supply reports.

use crate::chain::ChainRpcClient;
use crate::errors::RpcError;
use crate::types::{SupplyReply, Validator, ValidatorsReply};
use serde_json::json;
use std::time::Duration;

/// Platform-chain client: issuing plus staking queries.
#[derive(Debug)]
pub struct PlatformClient {
    chain: ChainRpcClient,
}

impl PlatformClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RpcError> {
        Ok(PlatformClient {
            chain: ChainRpcClient::platform(base_url, timeout)?,
        })
    }

    /// The issuing side of this client.
    pub fn chain(&self) -> &ChainRpcClient {
        &self.chain
    }

    /// Current validators of the primary network.
    pub async fn get_current_validators(&self) -> Result<Vec<Validator>, RpcError> {
        let reply: ValidatorsReply = self
            .chain
            .rpc()
            .call("platform.getCurrentValidators", json!({ "subnetID": null }))
            .await?;
        Ok(reply.validators)
    }

    /// Upper bound on the number of tokens that exist.
    pub async fn get_current_supply(&self) -> Result<u64, RpcError> {
        let reply: SupplyReply = self
            .chain
            .rpc()
            .call("platform.getCurrentSupply", json!({}))
            .await?;
        Ok(reply.supply)
    }
}
