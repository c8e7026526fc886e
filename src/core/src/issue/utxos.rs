//! Fetching the UTXOs a keychain owns.

use crate::codec::Codec;
use crate::errors::CoreError;
use crate::formatting::format_address;
use crate::issue::client::{UtxoIndex, UtxoSource};
use crate::keychain::Keychain;
use crate::types::{Id, Utxo, UtxoSet};
use tracing::debug;

/// Number of UTXOs requested per page.
pub const UTXO_PAGE_SIZE: u32 = 1024;

/// Fetches every UTXO owned by `keychain` on the chain `chain_alias`,
/// paging until a short page is returned.
///
/// With `source_chain` set, the atomic UTXOs exported to this chain by
/// `source_chain` are fetched instead.
pub async fn fetch_utxos<S: UtxoSource + ?Sized>(
    client: &S,
    codec: &Codec,
    chain_alias: &str,
    hrp: &str,
    source_chain: Option<&Id>,
    keychain: &Keychain,
) -> Result<UtxoSet, CoreError> {
    let owned_addresses = keychain
        .addresses()
        .map(|addr| format_address(chain_alias, hrp, addr.as_bytes()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut utxos = UtxoSet::new();
    let mut index = UtxoIndex::default();
    loop {
        let page = client
            .get_utxos(&owned_addresses, source_chain, UTXO_PAGE_SIZE, &index)
            .await?;
        index = page.end_index;

        for raw_utxo in &page.utxos {
            let utxo: Utxo = codec.unmarshal(raw_utxo)?;
            utxos.insert(utxo.utxo_id, utxo);
        }
        debug!(
            "Fetched {} UTXOs from {} ({} total)",
            page.utxos.len(),
            chain_alias,
            utxos.len()
        );

        if page.utxos.len() != UTXO_PAGE_SIZE as usize {
            return Ok(utxos);
        }
    }
}
