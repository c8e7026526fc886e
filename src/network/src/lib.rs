//! JSON-RPC clients for the node APIs.
//!
//! [`ChainRpcClient`] implements the collaborator traits of the `issue`
//! engine for the exchange and platform chains. [`PlatformClient`] and
//! [`InfoClient`] add the staking and peer queries used by the reports.

pub mod chain;
pub mod errors;
pub mod info;
pub mod platform;
pub mod rpc;
pub mod types;

// Re-export commonly used types
pub use chain::ChainRpcClient;
pub use errors::RpcError;
pub use info::InfoClient;
pub use platform::PlatformClient;
pub use rpc::{RpcClient, DEFAULT_API_TIMEOUT};
pub use types::{Delegator, Peer, Validator};
