use crate::{deployer::Deployment, error::DeployError};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddress {
    pub name: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub chain_id: u64,
    pub market: ContractAddress,
    pub nft: ContractAddress,
}

impl DeploymentRecord {
    pub fn new(chain_id: u64, deployment: &Deployment) -> Self {
        Self {
            chain_id,
            market: ContractAddress {
                name: deployment.market.name.clone(),
                address: deployment.market.address,
            },
            nft: ContractAddress {
                name: deployment.nft.name.clone(),
                address: deployment.nft.address,
            },
        }
    }
}

/// Persists the addresses of a finished deployment as JSON.
pub struct Checkpointer {
    path: PathBuf,
}

impl Checkpointer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the record's directory and fails if the record path is taken
    /// by a directory, so a bad path is caught before anything is deployed.
    pub fn prepare(&self) -> Result<(), DeployError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| DeployError::io(parent, e))?;
        }
        if self.path.is_dir() {
            return Err(DeployError::io(
                &self.path,
                std::io::Error::other("record path is a directory"),
            ));
        }
        Ok(())
    }

    pub fn save(&self, record: &DeploymentRecord) -> Result<(), DeployError> {
        self.prepare()?;
        info!("Saving deployed contracts to: {:#}", self.path.display());
        let file = File::create(&self.path).map_err(|e| DeployError::io(&self.path, e))?;
        serde_json::to_writer_pretty(file, record)?;
        Ok(())
    }

    pub fn load(&self) -> Result<DeploymentRecord, DeployError> {
        info!("Loading deployed contracts from: {:#}", self.path.display());
        let file = File::open(&self.path).map_err(|e| DeployError::io(&self.path, e))?;
        let record = serde_json::from_reader(file)?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::DeployedContract;
    use alloy::primitives::address;
    use tempfile::TempDir;

    fn deployment() -> Deployment {
        Deployment {
            market: DeployedContract {
                name: "NFTMarket".to_string(),
                address: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
                tx_hash: None,
            },
            nft: DeployedContract {
                name: "NFT".to_string(),
                address: address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
                tx_hash: None,
            },
        }
    }

    #[test]
    fn saves_and_loads_record() {
        let dir = TempDir::new().unwrap();
        let checkpointer = Checkpointer::new(dir.path().join("deployments/localhost.json"));
        let record = DeploymentRecord::new(31337, &deployment());

        checkpointer.save(&record).unwrap();
        assert_eq!(checkpointer.load().unwrap(), record);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(checkpointer.path()).unwrap()).unwrap();
        assert_eq!(raw["chain_id"], 31337);
        assert_eq!(raw["nft"]["name"], "NFT");
        let market: Address = raw["market"]["address"].as_str().unwrap().parse().unwrap();
        assert_eq!(market, record.market.address);
    }

    #[test]
    fn prepare_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let checkpointer = Checkpointer::new(dir.path().join("deployments/sepolia/record.json"));
        checkpointer.prepare().unwrap();
        assert!(dir.path().join("deployments/sepolia").is_dir());
        assert!(!checkpointer.path().exists());
    }

    #[test]
    fn prepare_rejects_unusable_paths() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("taken");
        fs::write(&file, "").unwrap();
        let err = Checkpointer::new(file.join("record.json")).prepare().unwrap_err();
        assert!(matches!(err, DeployError::Io { .. }));

        let err = Checkpointer::new(dir.path()).prepare().unwrap_err();
        assert!(matches!(err, DeployError::Io { .. }));
    }

    #[test]
    fn load_missing_record_fails() {
        let dir = TempDir::new().unwrap();
        let err = Checkpointer::new(dir.path().join("missing.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, DeployError::Io { .. }));
    }
}
