use alloy::primitives::TxHash;
use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("no artifact for contract {name} under {}", .root.display())]
    ArtifactNotFound { name: String, root: PathBuf },
    #[error("multiple artifacts for contract {name}, use a fully qualified name: {}", display_paths(.candidates))]
    AmbiguousArtifact {
        name: String,
        candidates: Vec<PathBuf>,
    },
    #[error("invalid artifact {}: {reason}", .path.display())]
    InvalidArtifact { path: PathBuf, reason: String },
    #[error("{0} is abstract or an interface and can't be deployed")]
    AbstractContract(String),
    #[error("{name} requires linking libraries: {}", .libraries.join(", "))]
    UnlinkedLibraries { name: String, libraries: Vec<String> },
    #[error("invalid constructor arguments for {name}: {source}")]
    ConstructorArguments {
        name: String,
        #[source]
        source: alloy::dyn_abi::Error,
    },
    #[error("deployment transaction for {name} failed: {source}")]
    Transaction {
        name: String,
        #[source]
        source: BoxError,
    },
    #[error("deployment of {name} reverted in transaction {tx_hash}")]
    Reverted { name: String, tx_hash: TxHash },
    #[error("receipt of transaction {tx_hash} for {name} has no contract address")]
    MissingContractAddress { name: String, tx_hash: TxHash },
    #[error("rpc request failed: {0}")]
    Rpc(#[source] BoxError),
    #[error("connected to chain {actual} but expected chain {expected}")]
    ChainMismatch { expected: u64, actual: u64 },
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("deployment record error: {0}")]
    Checkpoint(#[from] serde_json::Error),
}

impl DeployError {
    pub fn transaction(name: &str, source: impl Into<BoxError>) -> Self {
        DeployError::Transaction {
            name: name.to_string(),
            source: source.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeployError::Io {
            path: path.into(),
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
