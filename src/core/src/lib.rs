//! Coin selection, transaction assembly and confirmation for UTXO transfers.
//!
//! This crate holds the identifiers, outputs and transaction shapes of a
//! UTXO chain, the codec and keychain used to encode and sign them, and the
//! `issue` engine that turns batches of requested outputs into confirmed
//! transactions.

pub mod codec;
pub mod errors;
pub mod formatting;
pub mod issue;
pub mod keychain;
pub mod tx;
pub mod types;

// Re-export commonly used types
pub use codec::Codec;
pub use errors::CoreError;
pub use keychain::Keychain;
pub use tx::{SignedTx, Tx, UnsignedTx};
pub use types::{AssetAmounts, Id, ShortId, Status, TransferableOutput, Utxo, UtxoId, UtxoSet};
