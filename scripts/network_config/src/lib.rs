//! Static per-network parameters for the raffle deployment scripts.
//!
//! Everything numeric is kept as a decimal string so currency amounts never
//! pass through a float. Consumers parse into `U256` at the point of use.

use std::collections::BTreeMap;
use std::env;

/// Networks that run against a disposable local chain. Mocks are deployed
/// here instead of talking to the paid coordinator.
pub const DEVELOPMENT_CHAINS: &[&str] = &["hardhat", "localhost"];

/// Confirmations to wait before handing an address to the block explorer.
pub const VERIFICATION_BLOCK_CONFIRMATIONS: usize = 6;

pub fn is_development_chain(network_name: &str) -> bool {
    DEVELOPMENT_CHAINS.contains(&network_name)
}

/// Parameters for one chain, keyed by chain ID via [`network_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: &'static str,
    /// VRF coordinator address. `None` on local chains, where a mock is
    /// deployed instead.
    pub vrf_coordinator: Option<&'static str>,
    /// Raffle entrance fee in wei (0.01 ether).
    pub entrance_fee_wei: &'static str,
    /// 30 gwei key hash. Ignored by the mock coordinator, can be anything
    /// on local chains.
    pub gas_lane: &'static str,
    pub subscription_id: Option<&'static str>,
    pub callback_gas_limit: &'static str,
    pub interval_seconds: &'static str,
}

// https://docs.chain.link/vrf/v2/subscription/supported-networks for the
// sepolia coordinator and gwei key hash values.
pub fn network_config(chain_id: u64) -> Option<NetworkConfig> {
    match chain_id {
        11155111 => Some(NetworkConfig {
            name: "sepolia",
            vrf_coordinator: Some("0x8103B0A8A00be2DDC778e6e7eaa21791Cd364625"),
            entrance_fee_wei: "10000000000000000",
            gas_lane: "0x474e34a077df58807dbe9c96d3c009b23b3c6d0cce433e59bbf5b34f823bc56c",
            subscription_id: Some("0"),
            callback_gas_limit: "500000",
            interval_seconds: "30",
        }),
        31337 => Some(NetworkConfig {
            name: "hardhat",
            vrf_coordinator: None,
            entrance_fee_wei: "10000000000000000",
            gas_lane: "0x474e34a077df58807dbe9c96d3c009b23b3c6d0cce433e59bbf5b34f823bc56c",
            subscription_id: None,
            callback_gas_limit: "500000",
            interval_seconds: "30",
        }),
        _ => None,
    }
}

/// Chain ID for a symbolic network name. Both local names map to 31337.
pub fn chain_id(network_name: &str) -> Option<u64> {
    match network_name {
        "sepolia" => Some(11155111),
        "hardhat" | "localhost" => Some(31337),
        _ => None,
    }
}

/// Role name to account index, in the order accounts are handed to the
/// deployer. The "deployer" role must always resolve.
pub fn named_accounts() -> BTreeMap<String, usize> {
    BTreeMap::from([("deployer".to_string(), 0), ("player".to_string(), 1)])
}

/// Environment inputs consumed by the binaries. All optional here; each
/// binary decides which ones it cannot run without.
///
/// Note: use direnv to load these from .env into the shell.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub sepolia_rpc_url: Option<String>,
    pub private_key: Option<String>,
    pub etherscan_api_key: Option<String>,
    pub coinmarketcap_api_key: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            sepolia_rpc_url: env::var("SEPOLIA_RPC_URL").ok(),
            private_key: env::var("PRIVATE_KEY").ok(),
            etherscan_api_key: env::var("ETHERSCAN_API_KEY").ok(),
            coinmarketcap_api_key: env::var("COINMARKETCAP_API_KEY").ok(),
        }
    }
}
