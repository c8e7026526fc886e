//! Network services the issuing pipeline depends on.

use crate::errors::CoreError;
use crate::types::{Id, Status};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Pagination cursor of a UTXO query: the last address and UTXO returned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoIndex {
    /// Address the previous page ended on
    pub address: String,
    /// UTXO the previous page ended on
    pub utxo: String,
}

/// One page of encoded UTXOs and the cursor for the next page.
#[derive(Clone, Debug, Default)]
pub struct UtxoPage {
    /// Codec-encoded UTXOs
    pub utxos: Vec<Vec<u8>>,
    /// Where the next page starts
    pub end_index: UtxoIndex,
}

/// Status of an issued transaction, with the node's reason when it was
/// requested and the transaction was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxStatusReply {
    /// Reported status
    pub status: Status,
    /// Why the transaction was refused, if known
    pub reason: Option<String>,
}

/// Pages through the UTXOs owned by a set of addresses.
#[async_trait]
pub trait UtxoSource: Send + Sync {
    /// Returns at most `limit` UTXOs owned by `addrs`, starting after
    /// `start`. With `source_chain` set, the atomic UTXOs exported by that
    /// chain are returned instead.
    async fn get_utxos(
        &self,
        addrs: &[String],
        source_chain: Option<&Id>,
        limit: u32,
        start: &UtxoIndex,
    ) -> Result<UtxoPage, CoreError>;
}

/// Submits signed transactions.
#[async_trait]
pub trait TxIssuer: Send + Sync {
    /// Submits raw transaction bytes and returns the transaction id.
    async fn issue_tx(&self, tx_bytes: &[u8]) -> Result<Id, CoreError>;
}

/// Reports the status of submitted transactions.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Queries the status of `tx_id`, asking for a refusal reason when
    /// `include_reason` is set.
    async fn get_tx_status(&self, tx_id: &Id, include_reason: bool)
        -> Result<TxStatusReply, CoreError>;
}

/// Everything needed to issue transactions against one chain.
pub trait ChainClient: UtxoSource + TxIssuer + StatusSource {}

impl<T: UtxoSource + TxIssuer + StatusSource> ChainClient for T {}
