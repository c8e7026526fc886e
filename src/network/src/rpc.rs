//! Minimal JSON-RPC 2.0 client over HTTP.

use crate::errors::RpcError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Timeout applied to every API call unless configured otherwise.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC client bound to one API endpoint, e.g. `http://host:9650/ext/bc/X`.
#[derive(Debug)]
pub struct RpcClient {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Creates a client for `path` under the node at `base_url`.
    pub fn new(base_url: &str, path: &str, timeout: Duration) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(RpcClient {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), path),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Calls `method` with `params` and decodes its result.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        debug!("Calling {} on {}", method, self.url);

        let response = self.client.post(&self.url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(RpcError::Http(response.status().as_u16()));
        }

        let reply: JsonRpcResponse<T> = response.json().await?;
        if let Some(error) = reply.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        reply
            .result
            .ok_or_else(|| RpcError::MissingResult(method.to_string()))
    }
}
