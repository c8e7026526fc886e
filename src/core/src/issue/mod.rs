//! Coin selection, transaction assembly and confirmation polling.
//!
//! One batch of outputs flows through cost → selection → change → assembly →
//! signing → submission → confirmation. [`transfer::Transferer`] drives
//! batches through that pipeline one after another.

pub mod change;
pub mod client;
pub mod confirm;
pub mod cost;
pub mod inputs;
pub mod outputs;
pub mod transfer;
pub mod utxos;

pub use change::get_change_outputs;
pub use client::{ChainClient, StatusSource, TxIssuer, TxStatusReply, UtxoIndex, UtxoPage, UtxoSource};
pub use confirm::confirm_tx;
pub use cost::get_cost;
pub use inputs::{build_inputs, SelectedInputs};
pub use outputs::{build_outputs, MAX_OUTPUTS_PER_TX};
pub use transfer::{BatchReceipt, TransferConfig, TransferKind, Transferer};
pub use utxos::{fetch_utxos, UTXO_PAGE_SIZE};
