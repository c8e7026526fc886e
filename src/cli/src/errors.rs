//! Error types for the command line tools.

use issuer_core::CoreError;
use issuer_network::RpcError;
use std::error::Error as StdError;
use std::fmt;

/// Errors that can occur while running a command.
#[derive(Debug)]
pub enum CliError {
    /// Error when a file operation fails.
    FileError(std::io::Error),

    /// Error when JSON serialization or deserialization fails.
    JsonError(serde_json::Error),

    /// Error when a line is not valid hex.
    HexError(hex::FromHexError),

    /// Error raised by the issuing engine or its encodings.
    CoreError(CoreError),

    /// Error when a node API call fails.
    RpcError(RpcError),

    /// Error when no node endpoint was given to a command that needs one.
    MissingEndpoint,

    /// Error when a validator or delegator reports no potential reward.
    MissingReward(String),

    /// Error when stake or reward totals exceed 64 bits.
    AmountOverflow(String),

    /// Error when the reported supply is smaller than what was allocated.
    SupplyUnderflow,

    /// Error when a distribution plan is inconsistent.
    InvalidPlan(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileError(e) => write!(f, "File error: {}", e),
            CliError::JsonError(e) => write!(f, "JSON error: {}", e),
            CliError::HexError(e) => write!(f, "Hex error: {}", e),
            CliError::CoreError(e) => write!(f, "{}", e),
            CliError::RpcError(e) => write!(f, "{}", e),
            CliError::MissingEndpoint => {
                write!(f, "expected api endpoint to be provided as an argument")
            }
            CliError::MissingReward(who) => {
                write!(f, "expected {}'s potential reward to be present", who)
            }
            CliError::AmountOverflow(what) => write!(f, "{} overflows uint64", what),
            CliError::SupplyUnderflow => {
                write!(f, "current supply is below the initial and pending supply")
            }
            CliError::InvalidPlan(msg) => write!(f, "Invalid distribution plan: {}", msg),
        }
    }
}

impl StdError for CliError {}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::FileError(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::JsonError(error)
    }
}

impl From<hex::FromHexError> for CliError {
    fn from(error: hex::FromHexError) -> Self {
        CliError::HexError(error)
    }
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        CliError::CoreError(error)
    }
}

impl From<RpcError> for CliError {
    fn from(error: RpcError) -> Self {
        CliError::RpcError(error)
    }
}
