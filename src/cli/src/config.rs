//! Configuration for the command line tools.

use crate::errors::CliError;
use anyhow::Result;
use issuer_core::formatting::parse_address;
use issuer_core::issue::{TransferConfig, TransferKind};
use issuer_core::{Id, ShortId};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Nano-units in one whole unit of the native asset.
pub const AVAX: u64 = 1_000_000_000;
/// One thousand whole units.
pub const KILO_AVAX: u64 = 1_000 * AVAX;
/// One million whole units.
pub const MEGA_AVAX: u64 = 1_000 * KILO_AVAX;

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Timeout of a single API call, in milliseconds
    pub api_timeout_ms: u64,
    /// Smallest total stake, in whole units, a down validator is reported with
    pub down_threshold: u64,
    /// Status checks per issued transaction
    pub confirm_attempts: usize,
    /// Pause between status checks, in milliseconds
    pub confirm_delay_ms: u64,
    /// Pause between two batches, in milliseconds
    pub batch_interval_ms: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_timeout_ms: 3_000,
            down_threshold: 50_000,
            confirm_attempts: 100,
            confirm_delay_ms: 100,
            batch_interval_ms: 1_000,
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Where the configuration is read from when no path is given.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("issuer").join("config.json"))
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_millis(self.api_timeout_ms)
    }

    /// The down-report threshold in nano-units.
    pub fn down_threshold_amount(&self) -> Result<u64, CliError> {
        self.down_threshold
            .checked_mul(AVAX)
            .ok_or_else(|| CliError::AmountOverflow("down threshold".to_string()))
    }
}

/// Which transaction shape a distribution is issued as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanKind {
    Base,
    Export,
    Import,
}

/// A batch distribution of one asset to a list of recipients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionPlan {
    pub network_id: u32,
    pub kind: PlanKind,
    /// Id of the chain the transactions are issued on
    pub chain_id: String,
    /// Alias of that chain, e.g. `X` or `P`
    pub chain_alias: String,
    /// Required for exports
    #[serde(default)]
    pub destination_chain: Option<String>,
    /// Required for imports
    #[serde(default)]
    pub source_chain: Option<String>,
    /// Keys paying for the distribution; the first one receives change
    pub secret_keys: Vec<String>,
    /// Formatted recipient addresses
    pub recipients: Vec<String>,
    pub outputs_per_address: usize,
    pub asset_id: String,
    pub amount_per_output: u64,
    /// Defaults to the distributed asset
    #[serde(default)]
    pub fee_asset_id: Option<String>,
    #[serde(default)]
    pub fee_amount: u64,
}

impl DistributionPlan {
    /// Loads a plan from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn asset_id(&self) -> Result<Id, CliError> {
        Ok(self.asset_id.parse()?)
    }

    /// Raw addresses of the recipients.
    pub fn recipient_addresses(&self) -> Result<Vec<ShortId>, CliError> {
        self.recipients
            .iter()
            .map(|recipient| -> Result<ShortId, CliError> {
                let (_, _, bytes) = parse_address(recipient)?;
                Ok(ShortId::from_slice(&bytes)?)
            })
            .collect()
    }

    pub fn transfer_kind(&self) -> Result<TransferKind, CliError> {
        match self.kind {
            PlanKind::Base => Ok(TransferKind::Base),
            PlanKind::Export => {
                let chain = self.destination_chain.as_deref().ok_or_else(|| {
                    CliError::InvalidPlan("an export needs a destination_chain".to_string())
                })?;
                Ok(TransferKind::Export {
                    destination_chain: chain.parse()?,
                })
            }
            PlanKind::Import => {
                let chain = self.source_chain.as_deref().ok_or_else(|| {
                    CliError::InvalidPlan("an import needs a source_chain".to_string())
                })?;
                Ok(TransferKind::Import {
                    source_chain: chain.parse()?,
                })
            }
        }
    }

    /// Builds the transfer settings of this plan.
    pub fn transfer_config(&self, config: &CliConfig) -> Result<TransferConfig, CliError> {
        let fee_asset_id = match &self.fee_asset_id {
            Some(id) => id.parse()?,
            None => self.asset_id()?,
        };
        let mut transfer = TransferConfig::new(
            self.network_id,
            self.chain_id.parse()?,
            &self.chain_alias,
            self.transfer_kind()?,
        )
        .with_fee(fee_asset_id, self.fee_amount);
        transfer.confirm_attempts = config.confirm_attempts;
        transfer.confirm_delay = Duration::from_millis(config.confirm_delay_ms);
        transfer.batch_interval = Duration::from_millis(config.batch_interval_ms);
        Ok(transfer)
    }
}
