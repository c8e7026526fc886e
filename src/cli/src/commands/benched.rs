//! Report of peers that have benched at least one chain.

use crate::config::AVAX;
use crate::errors::CliError;
use issuer_network::{InfoClient, Peer, PlatformClient, Validator};

/// Formats every benched peer with the total stake of its validator, or
/// zero when it is not a current validator.
pub fn format_benched(peers: &[Peer], validators: &[Validator]) -> Result<Vec<String>, CliError> {
    peers
        .iter()
        .filter(|peer| !peer.benched.is_empty())
        .map(|peer| -> Result<String, CliError> {
            let stake = match validators.iter().find(|v| v.node_id == peer.node_id) {
                Some(validator) => validator.total_stake().ok_or_else(|| {
                    CliError::AmountOverflow(format!("stake of {}", validator.node_id))
                })?,
                None => 0,
            };
            Ok(format!(
                "{:<40} at {:<20} on {} with {}",
                peer.node_id,
                peer.ip,
                peer.version,
                stake / AVAX
            ))
        })
        .collect()
}

/// Runs the benched report.
pub async fn run(info: &InfoClient, platform: &PlatformClient) -> Result<Vec<String>, CliError> {
    let peers = info.peers().await?;
    let validators = platform.get_current_validators().await?;
    format_benched(&peers, &validators)
}
