use clap::{Parser, Subcommand};
use deployments::{manifest, ConsoleLogger};
use ethers::etherscan::Client;
use ethers::types::{Address, Chain};
use network_config::{is_development_chain, EnvConfig};
use std::{fs::read_to_string, path::Path, str::FromStr};
use verify::{verify_best_effort, EtherscanVerifier};

#[derive(Parser)]
#[command(name = "verify")]
#[command(about = "Verify a recorded deployment on Etherscan")]
struct Cli {
    #[command(subcommand)]
    network: Option<Network>,

    /// Contract name as recorded in the deployments manifest
    #[arg(short, long, default_value = "VRFCoordinatorV2Mock")]
    contract: String,

    /// Contract address (overrides the manifest entry)
    #[arg(short, long)]
    address: Option<String>,

    /// Path to the flattened Solidity source
    #[arg(short, long)]
    source: String,

    /// Fully qualified solc version
    #[arg(long, default_value = "v0.8.24+commit.e11b9ed9")]
    compiler_version: String,
}

#[derive(Subcommand)]
enum Network {
    /// Verify on Sepolia testnet
    Sepolia,
    /// Local node (nothing to verify, exits immediately)
    Localhost,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Note: Use direnv to load environment variables from .env

    let cli = Cli::parse();

    let network_name = match &cli.network {
        Some(Network::Sepolia) | None => "sepolia",
        Some(Network::Localhost) => "localhost",
    };
    if is_development_chain(network_name) {
        println!("{} is a local chain, nothing to verify", network_name);
        return Ok(());
    }

    let api_key = EnvConfig::from_env()
        .etherscan_api_key
        .expect("ETHERSCAN_API_KEY must be set in .env");

    // --address wins; otherwise the manifest written by deploy-mocks is the
    // source of truth for both the address and the constructor args.
    let (address, args) = match &cli.address {
        Some(raw) => (Address::from_str(raw)?, Vec::new()),
        None => {
            let stored = manifest::load(Path::new("deployments"), network_name, &cli.contract)?
                .ok_or_else(|| {
                    format!(
                        "no deployment of {} recorded for {}",
                        cli.contract, network_name
                    )
                })?;
            (stored.address, stored.args)
        }
    };

    let source = read_to_string(&cli.source)?;
    let client = Client::new(Chain::Sepolia, api_key)?;
    let verifier = EtherscanVerifier::new(
        client,
        cli.contract.clone(),
        source,
        cli.compiler_version.clone(),
    );

    println!(
        "🔎 Verifying {} at {:?} on {}",
        cli.contract, address, network_name
    );
    verify_best_effort(&verifier, address, &args, &ConsoleLogger).await;
    Ok(())
}
