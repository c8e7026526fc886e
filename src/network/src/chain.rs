//! Issuing client for a UTXO chain API (`avm.*` or `platform.*`).

use crate::errors::RpcError;
use crate::rpc::RpcClient;
use crate::types::{parse_status, IssueTxReply, TxStatusResponse, UtxosReply};
use async_trait::async_trait;
use issuer_core::formatting::{decode_hex_with_checksum, encode_hex_with_checksum};
use issuer_core::issue::{StatusSource, TxIssuer, TxStatusReply, UtxoIndex, UtxoPage, UtxoSource};
use issuer_core::{CoreError, Id};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Talks to one chain's API under the method namespace of its VM.
#[derive(Debug)]
pub struct ChainRpcClient {
    rpc: RpcClient,
    namespace: &'static str,
}

impl ChainRpcClient {
    /// Client for an exchange chain served at `/ext/bc/<alias>`.
    pub fn avm(base_url: &str, chain_alias: &str, timeout: Duration) -> Result<Self, RpcError> {
        Ok(ChainRpcClient {
            rpc: RpcClient::new(base_url, &format!("/ext/bc/{}", chain_alias), timeout)?,
            namespace: "avm",
        })
    }

    /// Client for the platform chain served at `/ext/bc/P`.
    pub fn platform(base_url: &str, timeout: Duration) -> Result<Self, RpcError> {
        Ok(ChainRpcClient {
            rpc: RpcClient::new(base_url, "/ext/bc/P", timeout)?,
            namespace: "platform",
        })
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    fn method(&self, name: &str) -> String {
        format!("{}.{}", self.namespace, name)
    }

    async fn utxos(
        &self,
        addrs: &[String],
        source_chain: Option<&Id>,
        limit: u32,
        start: &UtxoIndex,
    ) -> Result<UtxosReply, RpcError> {
        let mut params = Map::new();
        params.insert("addresses".to_string(), json!(addrs));
        params.insert("limit".to_string(), json!(limit));
        params.insert("encoding".to_string(), json!("hex"));
        if !start.address.is_empty() || !start.utxo.is_empty() {
            params.insert(
                "startIndex".to_string(),
                json!({"address": start.address, "utxo": start.utxo}),
            );
        }
        if let Some(chain) = source_chain {
            params.insert("sourceChain".to_string(), json!(chain.to_string()));
        }

        self.rpc.call(&self.method("getUTXOs"), Value::Object(params)).await
    }
}

#[async_trait]
impl UtxoSource for ChainRpcClient {
    async fn get_utxos(
        &self,
        addrs: &[String],
        source_chain: Option<&Id>,
        limit: u32,
        start: &UtxoIndex,
    ) -> Result<UtxoPage, CoreError> {
        let reply = self.utxos(addrs, source_chain, limit, start).await?;
        let utxos = reply
            .utxos
            .iter()
            .map(|utxo| decode_hex_with_checksum(utxo))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(UtxoPage {
            utxos,
            end_index: UtxoIndex {
                address: reply.end_index.address,
                utxo: reply.end_index.utxo,
            },
        })
    }
}

#[async_trait]
impl TxIssuer for ChainRpcClient {
    async fn issue_tx(&self, tx_bytes: &[u8]) -> Result<Id, CoreError> {
        let params = json!({
            "tx": encode_hex_with_checksum(tx_bytes),
            "encoding": "hex",
        });
        let reply: IssueTxReply = self
            .rpc
            .call(&self.method("issueTx"), params)
            .await
            .map_err(CoreError::from)?;
        reply.tx_id.parse()
    }
}

#[async_trait]
impl StatusSource for ChainRpcClient {
    async fn get_tx_status(&self, tx_id: &Id, include_reason: bool) -> Result<TxStatusReply, CoreError> {
        let mut params = json!({ "txID": tx_id.to_string() });
        if include_reason && self.namespace == "platform" {
            params["includeReason"] = json!(true);
        }

        // The exchange chain replies with the bare status string.
        let reply: Value = self
            .rpc
            .call(&self.method("getTxStatus"), params)
            .await
            .map_err(CoreError::from)?;
        let reply: TxStatusResponse = match reply {
            Value::String(status) => TxStatusResponse { status, reason: None },
            other => serde_json::from_value(other)
                .map_err(|e| CoreError::Network(format!("Invalid status reply: {}", e)))?,
        };

        Ok(TxStatusReply {
            status: parse_status(&reply.status),
            reason: reply.reason,
        })
    }
}
