//! Error types for the core crate.

use crate::types::Id;
use thiserror::Error;

/// Errors that can occur while building, signing or confirming transactions.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Error when a per-asset or running-sum accumulation exceeds `u64::MAX`.
    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    /// Error when the selected inputs cannot cover the cost of an asset.
    #[error("Insufficient funds: want to spend {needed} of asset {asset} but only have {have}")]
    InsufficientFunds {
        /// The asset that could not be covered
        asset: Id,
        /// The amount required by the cost map
        needed: u64,
        /// The amount the selected inputs provide
        have: u64,
    },

    /// Error when accumulating the spent amount of an asset overflows.
    #[error("Spent amount overflows uint64")]
    SpendOverflow,

    /// Error when the batching input repeats an address.
    #[error("Duplicated addresses")]
    DuplicateAddress,

    /// Error when an address string or wire payload is malformed.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Error when decoded bytes carry a codec version this crate does not know.
    #[error("Unsupported codec version: expected {expected}, got {actual}")]
    UnsupportedCodecVersion {
        /// The version this codec understands
        expected: u16,
        /// The version found in the payload
        actual: u16,
    },

    /// Error when encoding fails or a codec is misconfigured.
    #[error("Codec error: {0}")]
    Codec(String),

    /// Error when a transaction cannot be signed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Error surfaced by a collaborator call (UTXO fetch, submit, status).
    #[error("Network error: {0}")]
    Network(String),
}

impl From<bincode::Error> for CoreError {
    fn from(error: bincode::Error) -> Self {
        CoreError::Decode(error.to_string())
    }
}
