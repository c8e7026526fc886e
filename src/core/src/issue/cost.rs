//! Per-asset cost of a batch of outputs.

use crate::errors::CoreError;
use crate::types::{AssetAmounts, Id, TransferableOutput};

/// Sums the requested amount of every asset in `outs` and adds `fee_amount`
/// to `fee_asset_id`. Fails if any per-asset total exceeds `u64::MAX`.
pub fn get_cost(
    outs: &[TransferableOutput],
    fee_asset_id: Id,
    fee_amount: u64,
) -> Result<AssetAmounts, CoreError> {
    let mut amounts = AssetAmounts::new();
    for out in outs {
        add_amount(&mut amounts, out.asset_id, out.out.amount)?;
    }

    // Add the fee
    add_amount(&mut amounts, fee_asset_id, fee_amount)?;
    Ok(amounts)
}

fn add_amount(amounts: &mut AssetAmounts, asset_id: Id, amount: u64) -> Result<(), CoreError> {
    let entry = amounts.entry(asset_id).or_insert(0);
    *entry = entry.checked_add(amount).ok_or_else(|| {
        CoreError::ArithmeticOverflow(format!("cost of asset {} overflows uint64", asset_id))
    })?;
    Ok(())
}
