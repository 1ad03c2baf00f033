//! On-disk record of what is already deployed, one file per contract under
//! `deployments/<network>/`. A present entry means the contract is reused on
//! the next run instead of redeployed.

use std::fs;
use std::path::{Path, PathBuf};

use ethers::types::{Address, TxHash};
use serde::{Deserialize, Serialize};

use crate::DeployError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDeployment {
    pub address: Address,
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<TxHash>,
}

pub fn path_for(dir: &Path, network: &str, contract: &str) -> PathBuf {
    dir.join(network).join(format!("{contract}.json"))
}

pub fn load(
    dir: &Path,
    network: &str,
    contract: &str,
) -> Result<Option<StoredDeployment>, DeployError> {
    let path = path_for(dir, network, contract);
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

pub fn store(
    dir: &Path,
    network: &str,
    contract: &str,
    deployment: &StoredDeployment,
) -> Result<(), DeployError> {
    let path = path_for(dir, network, contract);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(deployment)?)?;
    Ok(())
}
