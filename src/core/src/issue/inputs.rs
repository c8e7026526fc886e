//! Selection of spendable UTXOs covering a cost map.

use crate::errors::CoreError;
use crate::keychain::Keychain;
use crate::tx::sort_inputs_with_signers;
use crate::types::{AssetAmounts, ShortId, TransferableInput, UtxoSet};
use tracing::debug;

/// The outcome of a successful selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectedInputs {
    /// Amount covered per asset
    pub spent: AssetAmounts,
    /// Chosen inputs, ordered by UTXO reference
    pub inputs: Vec<TransferableInput>,
    /// Signer addresses of each input, parallel to `inputs`
    pub signers: Vec<Vec<ShortId>>,
}

/// Walks `utxos` in reference order, taking every spendable UTXO of an
/// asset until that asset's cost is met.
///
/// UTXOs the keychain cannot authorize at `now`, whose authorization needs
/// no signer, or whose authorization carries no amount, are skipped. Selection is greedy rather than minimal,
/// and reproducible for the same inputs.
pub fn build_inputs(
    utxos: &UtxoSet,
    keychain: &Keychain,
    cost: &AssetAmounts,
    now: u64,
) -> Result<SelectedInputs, CoreError> {
    let mut spent = AssetAmounts::new();
    let mut inputs = Vec::new();
    let mut signers = Vec::new();

    for utxo in utxos.values() {
        let asset_id = utxo.asset_id;
        let amount = cost.get(&asset_id).copied().unwrap_or(0);
        let amount_spent = spent.get(&asset_id).copied().unwrap_or(0);

        if amount_spent >= amount {
            // enough is already allocated to this asset
            continue;
        }

        let (input, signer_set) = match keychain.spend(&utxo.out, now) {
            Some(spend) => spend,
            None => {
                debug!("Skipping {}: not spendable with these keys", utxo.utxo_id);
                continue;
            }
        };
        if signer_set.is_empty() {
            // a transaction cannot be signed for an input with no signers
            debug!("Skipping {}: no signer required", utxo.utxo_id);
            continue;
        }
        let input = match input.into_transfer() {
            Some(input) => input,
            None => continue,
        };

        let new_amount_spent = amount_spent
            .checked_add(input.amount)
            .ok_or(CoreError::SpendOverflow)?;
        spent.insert(asset_id, new_amount_spent);

        inputs.push(TransferableInput {
            utxo_id: utxo.utxo_id,
            asset_id,
            input,
        });
        signers.push(signer_set);
    }

    for (&asset, &needed) in cost {
        let have = spent.get(&asset).copied().unwrap_or(0);
        if have < needed {
            return Err(CoreError::InsufficientFunds {
                asset,
                needed,
                have,
            });
        }
    }

    sort_inputs_with_signers(&mut inputs, &mut signers);
    debug!("Selected {} inputs covering {} assets", inputs.len(), spent.len());
    Ok(SelectedInputs {
        spent,
        inputs,
        signers,
    })
}
