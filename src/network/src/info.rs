//! Node info queries.

use crate::errors::RpcError;
use crate::rpc::RpcClient;
use crate::types::{Peer, PeersReply};
use serde_json::json;
use std::time::Duration;

#[derive(Debug)]
pub struct InfoClient {
    rpc: RpcClient,
}

impl InfoClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RpcError> {
        Ok(InfoClient {
            rpc: RpcClient::new(base_url, "/ext/info", timeout)?,
        })
    }

    /// Peers the node is connected to.
    pub async fn peers(&self) -> Result<Vec<Peer>, RpcError> {
        let reply: PeersReply = self.rpc.call("info.peers", json!({})).await?;
        Ok(reply.peers)
    }
}
