//! Change outputs for surplus consumed value.

use crate::types::{AssetAmounts, ShortId, TransferableOutput};

/// Emits one output to `change_address` for every asset where `consumed`
/// exceeds `produced`, paying exactly the difference.
pub fn get_change_outputs(
    change_address: ShortId,
    produced: &AssetAmounts,
    consumed: &AssetAmounts,
) -> Vec<TransferableOutput> {
    consumed
        .iter()
        .filter_map(|(&asset_id, &amount_consumed)| {
            let amount_produced = produced.get(&asset_id).copied().unwrap_or(0);
            (amount_consumed > amount_produced).then(|| {
                TransferableOutput::pay_to(
                    asset_id,
                    amount_consumed - amount_produced,
                    change_address,
                )
            })
        })
        .collect()
}
