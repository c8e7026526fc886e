//! Report of validators that are down while holding significant stake.

use crate::config::AVAX;
use crate::errors::CliError;
use issuer_network::{PlatformClient, Validator};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Total stake of every validator reported as not connected, keyed by node
/// id. Validators without a connectivity report are left out.
pub fn downed_stake(validators: &[Validator]) -> Result<BTreeMap<String, u64>, CliError> {
    let mut down = BTreeMap::new();
    for validator in validators {
        match validator.connected {
            Some(false) => {}
            Some(true) => continue,
            None => {
                warn!("No connectivity reported for {}", validator.node_id);
                continue;
            }
        }
        let stake = validator.total_stake().ok_or_else(|| {
            CliError::AmountOverflow(format!("stake of {}", validator.node_id))
        })?;
        down.insert(validator.node_id.clone(), stake);
    }
    Ok(down)
}

/// One line per down validator whose stake is at least `threshold`.
pub fn format_down(down: &BTreeMap<String, u64>, threshold: u64) -> Vec<String> {
    down.iter()
        .filter(|(_, stake)| **stake >= threshold)
        .map(|(node_id, stake)| format!("{:<40} with {}", node_id, stake / AVAX))
        .collect()
}

/// Runs the down report.
pub async fn run(client: &PlatformClient, threshold: u64) -> Result<Vec<String>, CliError> {
    let validators = client.get_current_validators().await?;
    let down = downed_stake(&validators)?;
    debug!("{} of {} validators are down", down.len(), validators.len());
    Ok(format_down(&down, threshold))
}
