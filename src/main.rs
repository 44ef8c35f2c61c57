//! cast-attest
//!
//! Canonicalizes URLs and hex tokens to bytes32 and attests them on EAS.
//!
//! # Architecture Overview
//!
//! ```text
//!   url / hex input
//!        │
//!        ▼
//!   ┌───────────┐    ┌──────────────────────┐    ┌─────────────┐
//!   │ canonical │───▶│ SubmissionController │───▶│ attestation │──▶ EAS.attest
//!   └───────────┘    └──────────┬───────────┘    └──────▲──────┘
//!                               │                       │
//!                               ▼                       │
//!                        ┌─────────────┐         ┌──────┴──────┐
//!                        │   wallet    │────────▶│  signer     │
//!                        │ (node/key)  │         │ (EIP-1193)  │
//!                        └─────────────┘         └─────────────┘
//! ```
//!
//! The local key is read from `CAST_ATTEST_PRIVATE_KEY`. Without it the
//! configured node account signs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use alloy::primitives::Address;
use clap::{ArgGroup, Parser, Subcommand};

use cast_attest::attestation::AttestationSettings;
use cast_attest::blockchain::{BlockchainClient, BlockchainConfig, Wallet};
use cast_attest::canonical::{canonicalize, InputMode};
use cast_attest::config::{load_config, AppConfig};
use cast_attest::observability::{logging, metrics};
use cast_attest::submission::SubmissionController;
use cast_attest::wallet::{ConfirmationPolicy, NodeWalletClient, WalletClient};

#[derive(Parser)]
#[command(name = "cast-attest", version)]
#[command(about = "Attest content hashes on the Ethereum Attestation Service", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Canonicalize the last two path segments of a URL
    Url { url: String },
    /// Canonicalize a hex token
    Hex { value: String },
    /// Canonicalize an input and attest it
    #[command(group(ArgGroup::new("input").required(true).args(["url", "hex"])))]
    Attest {
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        hex: Option<String>,
    },
    /// Validate configuration and check the RPC endpoint
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(cli.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "cast-attest starting");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    match cli.command {
        Commands::Url { url } => print_processed(InputMode::Url, &url)?,
        Commands::Hex { value } => print_processed(InputMode::Hex, &value)?,
        Commands::Attest { url, hex } => {
            let (mode, raw) = match (url, hex) {
                (Some(url), _) => (InputMode::Url, url),
                (None, Some(hex)) => (InputMode::Hex, hex),
                (None, None) => return Err("either --url or --hex is required".into()),
            };
            attest(&config, mode, &raw).await?;
        }
        Commands::Check => check(&config).await?,
    }

    Ok(())
}

fn load(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(AppConfig::default()),
    }
}

fn print_processed(mode: InputMode, raw: &str) -> Result<(), Box<dyn std::error::Error>> {
    let processed = canonicalize(mode, raw)?;
    println!("{}", serde_json::to_string_pretty(&processed)?);
    Ok(())
}

/// Node-backed wallet client, or `None` when no account is configured.
async fn connect_wallet(
    config: &BlockchainConfig,
) -> Result<Option<Arc<dyn WalletClient>>, Box<dyn std::error::Error>> {
    let key = Wallet::from_env()?;
    let account = match &key {
        Some(wallet) => Some(wallet.address()),
        None => config
            .account
            .as_deref()
            .map(str::parse::<Address>)
            .transpose()?,
    };

    let Some(account) = account else {
        tracing::warn!("No signing account: set CAST_ATTEST_PRIVATE_KEY or blockchain.account");
        return Ok(None);
    };

    let client = BlockchainClient::new(config.clone(), key.as_ref())?;
    client.verify_chain_id().await?;

    Ok(Some(Arc::new(NodeWalletClient::new(client, Some(account)))))
}

async fn attest(
    config: &AppConfig,
    mode: InputMode,
    raw: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Arc::new(AttestationSettings::from_config(&config.attestation)?);
    let policy = ConfirmationPolicy::from_config(&config.blockchain);
    let wallet = connect_wallet(&config.blockchain).await?;

    let controller = SubmissionController::new(settings, policy, wallet);
    controller.set_input(mode, raw)?;

    tokio::select! {
        result = controller.submit() => {
            let attestation = result?;
            println!("{}", serde_json::to_string_pretty(&attestation)?);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted; a broadcast transaction may still be mined");
        }
    }

    if let Some(error) = controller.snapshot().error {
        return Err(error.into());
    }
    Ok(())
}

async fn check(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let settings = AttestationSettings::from_config(&config.attestation)?;
    tracing::info!(
        contract = %settings.contract_address,
        schema_uid = %settings.schema.uid,
        schema = settings.schema.encoder.schema(),
        "Attestation target"
    );

    match connect_wallet(&config.blockchain).await? {
        Some(wallet) => {
            println!(
                "ok: chain {} via {}, account {}",
                config.blockchain.chain_id,
                config.blockchain.rpc_url,
                wallet.account().map(|a| a.to_string()).unwrap_or_default()
            );
        }
        None => {
            let client = BlockchainClient::new(config.blockchain.clone(), None)?;
            client.verify_chain_id().await?;
            println!(
                "ok: chain {} via {}, no signing account",
                config.blockchain.chain_id, config.blockchain.rpc_url
            );
        }
    }
    Ok(())
}
