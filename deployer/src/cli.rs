use crate::deployer::{ContractNames, MARKET_CONTRACT, NFT_CONTRACT};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use url::Url;

/// Account #0 of the default local development mnemonic, funded by both
/// anvil and the hardhat node.
pub const DEV_ACCOUNT_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

#[derive(Clone, Parser, Serialize)]
pub struct BaseConfig {
    /// Full node RPC URL, takes precedence over host and port
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: Option<Url>,

    /// Node host
    #[arg(long, env = "NODE_HOST", default_value = "localhost")]
    pub node_host: String,

    /// Node port
    #[arg(long, env = "NODE_PORT", default_value = "8545")]
    pub node_port: String,

    /// Owner private key (with or without 0x prefix)
    #[arg(long, env = "OWNER_KEY", default_value = DEV_ACCOUNT_KEY, hide_default_value = true)]
    #[serde(skip_serializing)]
    pub owner_key: String,

    /// Expected chain ID, checked against the node before deploying
    #[arg(long, env = "CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Gas limit for each deployment transaction, estimated when unset
    #[arg(long, env = "MAX_GAS")]
    pub max_gas: Option<u64>,

    /// Path to contract artifacts
    #[arg(long, env = "ARTIFACTS_DIR", default_value = "artifacts")]
    pub artifacts_dir: PathBuf,
}

impl BaseConfig {
    pub fn node_url(&self) -> Result<Url, url::ParseError> {
        match &self.rpc_url {
            Some(url) => Ok(url.clone()),
            None => {
                let node_url = format!("http://{}:{}", self.node_host, self.node_port);
                Url::parse(&node_url)
            }
        }
    }
}

#[derive(Clone, Parser, Serialize)]
#[command(author, version, about = "Deploy the NFT marketplace contracts", long_about = None)]
pub struct DeployConfig {
    #[clap(flatten)]
    pub base: BaseConfig,

    /// Marketplace contract name, optionally fully qualified (`path/File.sol:Name`)
    #[arg(long, env = "MARKET_CONTRACT", default_value = MARKET_CONTRACT)]
    pub market_contract: String,

    /// NFT contract name, deployed with the marketplace address as constructor argument
    #[arg(long, env = "NFT_CONTRACT", default_value = NFT_CONTRACT)]
    pub nft_contract: String,

    /// Write the deployed addresses as JSON to this file
    #[arg(long, env = "DEPLOYMENT_OUTPUT")]
    pub output: Option<PathBuf>,
}

impl DeployConfig {
    pub fn node_url(&self) -> Result<Url, url::ParseError> {
        self.base.node_url()
    }

    pub fn contract_names(&self) -> ContractNames {
        ContractNames {
            market: self.market_contract.clone(),
            nft: self.nft_contract.clone(),
        }
    }
}
