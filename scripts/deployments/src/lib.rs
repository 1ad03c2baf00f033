//! Contract deployment plumbing for the raffle scripts: named-account
//! resolution, a `Deploy` seam the scripts call through, and an ethers-backed
//! implementation that deploys from hardhat-style artifacts and records every
//! deployment in a per-network manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use ethers::abi::Token;
use ethers::contract::ContractFactory;
use ethers::providers::Middleware;
use ethers::types::{Address, TxHash, U256};
use thiserror::Error;

pub mod artifact;
pub mod manifest;

/// Log sink for the scripts. Kept behind a trait so tests can capture the
/// exact lines a step emits.
pub trait Logger {
    fn log(&self, message: &str);
}

/// Writes each line to stdout.
#[derive(Debug, Default)]
pub struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        println!("{message}");
    }
}

/// Accounts by role name ("deployer", "player", ...). The role map gives the
/// index of each role into the ordered account list.
#[derive(Debug, Clone)]
pub struct NamedAccounts {
    accounts: Vec<Address>,
    roles: BTreeMap<String, usize>,
}

impl NamedAccounts {
    pub fn new(accounts: Vec<Address>, roles: BTreeMap<String, usize>) -> Self {
        Self { accounts, roles }
    }

    /// Resolves a role to its address. `None` when the role is unknown or
    /// its index points past the accounts actually available on this run.
    pub fn address_of(&self, role: &str) -> Option<Address> {
        let index = *self.roles.get(role)?;
        self.accounts.get(index).copied()
    }
}

/// Constructor arguments stay decimal-string encoded until the moment they
/// are tokenized, so fixed-point currency amounts never touch a float.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    pub from: Address,
    pub args: Vec<String>,
    pub log: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub contract: String,
    pub address: Address,
    pub transaction_hash: Option<TxHash>,
    pub args: Vec<String>,
    /// False when the manifest already held this contract and the existing
    /// instance was reused.
    pub newly_deployed: bool,
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("no artifact for {contract} under {}", .dir.display())]
    MissingArtifact { contract: String, dir: PathBuf },
    #[error("constructor argument {0:?} is not a decimal unsigned integer")]
    InvalidArgument(String),
    #[error("named account {0:?} is not configured")]
    MissingAccount(&'static str),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("deployment of {contract} failed: {message}")]
    Rpc { contract: String, message: String },
}

/// The deployment capability. Implementations are expected to be
/// idempotent-by-tag: redeploying an unchanged contract name should reuse
/// the recorded instance rather than create a second one.
#[async_trait]
pub trait Deploy {
    async fn deploy(
        &self,
        contract: &str,
        opts: DeployOptions,
    ) -> Result<DeploymentRecord, DeployError>;
}

/// Tokenizes decimal-string constructor arguments as uint256 values.
pub fn constructor_tokens(args: &[String]) -> Result<Vec<Token>, DeployError> {
    args.iter()
        .map(|arg| {
            U256::from_dec_str(arg)
                .map(Token::Uint)
                .map_err(|_| DeployError::InvalidArgument(arg.clone()))
        })
        .collect()
}

/// Deploys contracts from `artifacts/<Name>.json` through a signing
/// middleware and records the result under `deployments/<network>/`.
#[derive(Debug)]
pub struct ArtifactDeployer<M> {
    client: Arc<M>,
    network: String,
    artifacts_dir: PathBuf,
    deployments_dir: PathBuf,
    confirmations: usize,
}

impl<M> ArtifactDeployer<M> {
    pub fn new(
        client: Arc<M>,
        network: impl Into<String>,
        artifacts_dir: impl AsRef<Path>,
        deployments_dir: impl AsRef<Path>,
        confirmations: usize,
    ) -> Self {
        Self {
            client,
            network: network.into(),
            artifacts_dir: artifacts_dir.as_ref().to_path_buf(),
            deployments_dir: deployments_dir.as_ref().to_path_buf(),
            confirmations,
        }
    }
}

#[async_trait]
impl<M: Middleware + 'static> Deploy for ArtifactDeployer<M> {
    async fn deploy(
        &self,
        contract: &str,
        opts: DeployOptions,
    ) -> Result<DeploymentRecord, DeployError> {
        if let Some(existing) = manifest::load(&self.deployments_dir, &self.network, contract)? {
            if opts.log {
                println!("reusing {} at {:?}", contract, existing.address);
            }
            return Ok(DeploymentRecord {
                contract: contract.to_string(),
                address: existing.address,
                transaction_hash: existing.transaction_hash,
                args: existing.args,
                newly_deployed: false,
            });
        }

        let artifact = artifact::load(&self.artifacts_dir, contract)?;
        let tokens = constructor_tokens(&opts.args)?;

        let factory = ContractFactory::new(artifact.abi, artifact.bytecode, self.client.clone());
        let mut deployer = factory
            .deploy_tokens(tokens)
            .map_err(|e| DeployError::Rpc {
                contract: contract.to_string(),
                message: e.to_string(),
            })?
            .confirmations(self.confirmations);
        deployer.tx.set_from(opts.from);

        let (deployed, receipt) = deployer
            .send_with_receipt()
            .await
            .map_err(|e| DeployError::Rpc {
                contract: contract.to_string(),
                message: e.to_string(),
            })?;

        let record = DeploymentRecord {
            contract: contract.to_string(),
            address: deployed.address(),
            transaction_hash: Some(receipt.transaction_hash),
            args: opts.args,
            newly_deployed: true,
        };
        manifest::store(
            &self.deployments_dir,
            &self.network,
            contract,
            &manifest::StoredDeployment {
                address: record.address,
                args: record.args.clone(),
                transaction_hash: record.transaction_hash,
            },
        )?;
        if opts.log {
            println!(
                "deployed {} at {:?} (tx: {:?})",
                contract, record.address, receipt.transaction_hash
            );
        }
        Ok(record)
    }
}
