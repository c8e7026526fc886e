//! Amount minted by staking rewards since genesis.

use crate::config::MEGA_AVAX;
use crate::errors::CliError;
use issuer_network::{PlatformClient, Validator};

/// Supply allocated at genesis.
pub const INITIAL_SUPPLY: u64 = 360 * MEGA_AVAX;

/// Current supply minus the initial supply and every reward that is still
/// pending for current validators and delegators.
pub fn minted_supply(current_supply: u64, validators: &[Validator]) -> Result<u64, CliError> {
    let mut pending = 0u64;
    for validator in validators {
        let reward = validator
            .potential_reward
            .ok_or_else(|| CliError::MissingReward("validator".to_string()))?;
        pending = add_reward(pending, reward)?;

        for delegator in &validator.delegators {
            let reward = delegator
                .potential_reward
                .ok_or_else(|| CliError::MissingReward("delegator".to_string()))?;
            pending = add_reward(pending, reward)?;
        }
    }

    current_supply
        .checked_sub(INITIAL_SUPPLY)
        .and_then(|minted| minted.checked_sub(pending))
        .ok_or(CliError::SupplyUnderflow)
}

fn add_reward(total: u64, reward: u64) -> Result<u64, CliError> {
    total
        .checked_add(reward)
        .ok_or_else(|| CliError::AmountOverflow("pending rewards".to_string()))
}

/// Runs the supply report.
pub async fn run(client: &PlatformClient) -> Result<u64, CliError> {
    let current_supply = client.get_current_supply().await?;
    let validators = client.get_current_validators().await?;
    minted_supply(current_supply, &validators)
}
