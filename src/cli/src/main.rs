//! The `issuer` command line tool.

use anyhow::Result;
use colored::Colorize;
use issuer_cli::commands::{benched, checksum, distribute, down, sign, supply};
use issuer_cli::config::AVAX;
use issuer_cli::{CliConfig, CliError, DistributionPlan};
use issuer_core::codec::{Codec, DEFAULT_MAX_SIZE};
use issuer_network::{InfoClient, PlatformClient};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Command line arguments for the issuer.
#[derive(Debug, StructOpt)]
#[structopt(name = "issuer", about = "Issue UTXO transfers and inspect validators")]
struct Opt {
    /// Node API endpoint, e.g. http://127.0.0.1:9650
    endpoint: Option<String>,

    /// Path to the configuration file
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Subcommand to run; reports down validators when omitted
    #[structopt(subcommand)]
    cmd: Option<Command>,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// List disconnected validators holding at least the configured stake
    #[structopt(name = "down")]
    Down,

    /// List peers that benched a chain
    #[structopt(name = "benched")]
    Benched,

    /// Print the amount minted by staking rewards
    #[structopt(name = "supply")]
    Supply,

    /// Add checksums to raw hex lines
    #[structopt(name = "checksum")]
    Checksum {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        #[structopt(parse(from_os_str))]
        output: PathBuf,
    },

    /// Sign raw hex unsigned transactions with one key
    #[structopt(name = "sign")]
    Sign {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        #[structopt(parse(from_os_str))]
        output: PathBuf,
        /// Secret key as PrivateKey-<cb58> or hex
        key: String,
    },

    /// Distribute an asset as described by a plan file
    #[structopt(name = "distribute")]
    Distribute {
        #[structopt(parse(from_os_str))]
        plan: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<CliConfig> {
    if let Some(path) = path {
        return CliConfig::from_file(path);
    }
    match CliConfig::default_path() {
        Some(path) if path.exists() => {
            debug!("Using configuration at {}", path.display());
            CliConfig::from_file(path)
        }
        _ => Ok(CliConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let opt = Opt::from_args();
    let config = load_config(opt.config.as_ref())?;
    let codec = Codec::new(DEFAULT_MAX_SIZE)?;
    let endpoint = opt.endpoint.as_deref().ok_or(CliError::MissingEndpoint);

    match opt.cmd.unwrap_or(Command::Down) {
        Command::Down => {
            let platform = PlatformClient::new(endpoint?, config.api_timeout())?;
            for line in down::run(&platform, config.down_threshold_amount()?).await? {
                println!("{}", line);
            }
        }
        Command::Benched => {
            let endpoint = endpoint?;
            let info = InfoClient::new(endpoint, config.api_timeout())?;
            let platform = PlatformClient::new(endpoint, config.api_timeout())?;
            for line in benched::run(&info, &platform).await? {
                println!("{}", line);
            }
        }
        Command::Supply => {
            let platform = PlatformClient::new(endpoint?, config.api_timeout())?;
            let minted = supply::run(&platform).await?;
            println!("{} {}", "Minted:".green(), minted / AVAX);
        }
        Command::Checksum { input, output } => {
            let count = checksum::run(&input, &output)?;
            println!("{} {} lines to {}", "Checksummed".green(), count, output.display());
        }
        Command::Sign { input, output, key } => {
            let count = sign::run(&input, &output, &key, &codec)?;
            println!("{} {} transactions to {}", "Signed".green(), count, output.display());
        }
        Command::Distribute { plan } => {
            let plan = DistributionPlan::from_file(&plan)?;
            let receipts = distribute::run(endpoint?, &codec, &config, &plan).await?;
            for receipt in receipts {
                println!(
                    "{} {} ({}) change to {}, {} outputs sent",
                    "Issued".green(),
                    receipt.tx_id,
                    receipt.status,
                    receipt.change_address,
                    receipt.num_sent
                );
            }
        }
    }

    Ok(())
}
