use clap::{Parser, Subcommand};
use deploy_mocks::{run, DeployContext};
use deployments::{ArtifactDeployer, ConsoleLogger, NamedAccounts};
use ethers::{
    core::k256::ecdsa::SigningKey,
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
};
use network_config::{
    is_development_chain, named_accounts, network_config, EnvConfig,
    VERIFICATION_BLOCK_CONFIRMATIONS,
};
use std::sync::Arc;

// First two auto-funded keys of a stock hardhat/anvil node. Public test
// keys, never to be used anywhere money is real.
const LOCAL_DEPLOYER_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const LOCAL_PLAYER_KEY: &str =
    "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

#[derive(Parser)]
#[command(name = "deploy-mocks")]
#[command(about = "Deploy the mock VRF coordinator on local development networks")]
struct Cli {
    #[command(subcommand)]
    network: Option<Network>,

    /// RPC URL (overrides the network default and env vars)
    #[arg(short, long)]
    rpc_url: Option<String>,
}

#[derive(Subcommand)]
enum Network {
    /// Deploy against a node running on localhost
    Localhost,
    /// Run against Sepolia testnet (the step skips mocks there)
    Sepolia,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Note: Use direnv to load environment variables from .env
    // direnv will automatically load them into the shell, and env::var() will see them

    let cli = Cli::parse();
    let env_config = EnvConfig::from_env();

    let network_name = match &cli.network {
        Some(Network::Sepolia) => "sepolia",
        Some(Network::Localhost) | None => "localhost",
    };

    let url = cli
        .rpc_url
        .or_else(|| match network_name {
            "sepolia" => env_config.sepolia_rpc_url.clone(),
            _ => Some("http://127.0.0.1:8545".to_string()),
        })
        .expect("RPC URL must be set via --rpc-url or SEPOLIA_RPC_URL env var");

    println!("Using RPC URL: {}", url);
    let provider: Provider<Http> = Provider::try_from(url.as_str())?;
    let chain_id = provider.get_chainid().await?.as_u64();
    match network_config(chain_id) {
        Some(config) => println!("Chain id: {} ({})", chain_id, config.name),
        None => println!("Chain id: {} (no static config)", chain_id),
    }

    // Local nodes come with funded accounts for both roles; live networks
    // run with the single key supplied through the environment.
    let keys: Vec<String> = if is_development_chain(network_name) {
        vec![LOCAL_DEPLOYER_KEY.to_string(), LOCAL_PLAYER_KEY.to_string()]
    } else {
        vec![env_config
            .private_key
            .clone()
            .expect("PRIVATE_KEY must be set in .env")]
    };

    let mut wallets: Vec<LocalWallet> = Vec::with_capacity(keys.len());
    for key in &keys {
        let key_bytes = hex::decode(key.trim_start_matches("0x"))?;
        let signing_key = SigningKey::from_bytes(key_bytes.as_slice().into())?;
        wallets.push(LocalWallet::from(signing_key).with_chain_id(chain_id));
    }
    let deployer_wallet = wallets[0].clone();
    println!("Deployer address: {:?}", deployer_wallet.address());

    let accounts = NamedAccounts::new(
        wallets.iter().map(|w| w.address()).collect(),
        named_accounts(),
    );
    let signer = Arc::new(SignerMiddleware::new(provider, deployer_wallet));

    let confirmations = if is_development_chain(network_name) {
        1
    } else {
        VERIFICATION_BLOCK_CONFIRMATIONS
    };
    let deployments =
        ArtifactDeployer::new(signer, network_name, "artifacts", "deployments", confirmations);

    println!("🚀 Running mock deployment step on {}...", network_name);
    run(DeployContext {
        network: network_name,
        accounts: &accounts,
        deployments: &deployments,
        log: &ConsoleLogger,
    })
    .await?;
    println!("✅ Done");

    Ok(())
}
