//! Partitioning of requested outputs into transaction-sized batches.

use crate::errors::CoreError;
use crate::types::{Id, ShortId, TransferableOutput};
use std::mem;
use tracing::debug;

/// Most requested outputs a single batch may hold.
///
/// Change is added on top when the batch is assembled, so a full batch is
/// issued with up to one more output per fee or payment asset.
pub const MAX_OUTPUTS_PER_TX: usize = 1000;

/// Creates `num_utxos_per_address` outputs of `amount_per_utxo` for every
/// address, in ascending address order, split into batches.
///
/// A batch is closed when it already holds [`MAX_OUTPUTS_PER_TX`] outputs or
/// when the next output would overflow its running `u64` sum; the next batch
/// then starts with that output.
pub fn build_outputs(
    addresses: &[ShortId],
    num_utxos_per_address: usize,
    asset_id: Id,
    amount_per_utxo: u64,
) -> Result<Vec<Vec<TransferableOutput>>, CoreError> {
    let mut addresses = addresses.to_vec();
    addresses.sort();
    if addresses.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(CoreError::DuplicateAddress);
    }

    let mut batches = Vec::new();
    let mut current_amount = 0u64;
    let mut current = Vec::new();
    for addr in &addresses {
        debug!("Adding {} outputs for {}", num_utxos_per_address, addr);

        for _ in 0..num_utxos_per_address {
            match current_amount.checked_add(amount_per_utxo) {
                Some(new_amount) if current.len() < MAX_OUTPUTS_PER_TX => {
                    current_amount = new_amount;
                }
                _ => {
                    batches.push(mem::take(&mut current));
                    current_amount = amount_per_utxo;
                }
            }
            current.push(TransferableOutput::pay_to(asset_id, amount_per_utxo, *addr));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    Ok(batches)
}
