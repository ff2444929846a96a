use crate::{
    error::DeployError,
    factory::{ContractFactory, DeployedContract, FactoryResolver},
};
use alloy::dyn_abi::DynSolValue;
use std::fmt;
use tracing::info;

pub const MARKET_CONTRACT: &str = "NFTMarket";
pub const NFT_CONTRACT: &str = "NFT";

#[derive(Debug, Clone)]
pub struct ContractNames {
    pub market: String,
    pub nft: String,
}

impl Default for ContractNames {
    fn default() -> Self {
        Self {
            market: MARKET_CONTRACT.to_string(),
            nft: NFT_CONTRACT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub market: DeployedContract,
    pub nft: DeployedContract,
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NFT Contract deployed to: {}", self.nft.address)?;
        write!(f, "Market Contract deployed to: {}", self.market.address)
    }
}

/// Deploys the marketplace, then the NFT contract with the marketplace address
/// as its only constructor argument. The first failure aborts the rest.
pub async fn deploy_marketplace<R: FactoryResolver>(
    resolver: &R,
    names: &ContractNames,
) -> Result<Deployment, DeployError> {
    info!("Deploying {}", names.market);
    let market = resolver
        .get_contract_factory(&names.market)?
        .deploy(Vec::new())
        .await?;
    info!("Deployed {} at {}", market.name, market.address);

    info!("Deploying {}", names.nft);
    let nft = resolver
        .get_contract_factory(&names.nft)?
        .deploy(vec![DynSolValue::Address(market.address)])
        .await?;
    info!("Deployed {} at {}", nft.name, nft.address);

    Ok(Deployment { market, nft })
}
