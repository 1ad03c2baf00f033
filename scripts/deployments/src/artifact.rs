use std::fs;
use std::path::Path;

use ethers::abi::Abi;
use ethers::types::Bytes;
use serde::Deserialize;

use crate::DeployError;

/// The subset of a hardhat build artifact the deployer needs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    pub abi: Abi,
    pub bytecode: Bytes,
}

/// Reads `<dir>/<Contract>.json`.
pub fn load(dir: &Path, contract: &str) -> Result<ContractArtifact, DeployError> {
    let path = dir.join(format!("{contract}.json"));
    if !path.exists() {
        return Err(DeployError::MissingArtifact {
            contract: contract.to_string(),
            dir: dir.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&raw)?)
}
