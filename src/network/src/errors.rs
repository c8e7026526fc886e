/// Error types for the network crate.
use issuer_core::CoreError;
use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur while talking to a node API.
#[derive(Debug)]
pub enum RpcError {
    /// Error when the request could not be sent or the reply not read.
    Transport(String),

    /// Error when the node answers with a non-success HTTP status.
    Http(u16),

    /// Error object returned by the node.
    Rpc { code: i64, message: String },

    /// Error when a reply carries neither a result nor an error.
    MissingResult(String),

    /// Error when a result does not have the expected shape.
    InvalidPayload(String),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::Transport(msg) => write!(f, "Transport error: {}", msg),
            RpcError::Http(status) => write!(f, "HTTP error: {}", status),
            RpcError::Rpc { code, message } => write!(f, "RPC error {}: {}", code, message),
            RpcError::MissingResult(method) => write!(f, "Missing result in reply to {}", method),
            RpcError::InvalidPayload(msg) => write!(f, "Invalid payload: {}", msg),
        }
    }
}

impl StdError for RpcError {}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        RpcError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::InvalidPayload(err.to_string())
    }
}

impl From<RpcError> for CoreError {
    fn from(err: RpcError) -> Self {
        CoreError::Network(err.to_string())
    }
}
