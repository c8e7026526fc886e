//! Command line tools for issuing transfers and inspecting validators.

pub mod commands;
pub mod config;
pub mod errors;

// Re-export commonly used types and functions
pub use commands::{benched, checksum, distribute, down, sign, supply};
pub use config::{CliConfig, DistributionPlan};
pub use errors::CliError;
