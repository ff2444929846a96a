use crate::{
    artifact::{Artifact, ArtifactStore},
    error::DeployError,
};
use alloy::{
    contract::RawCallBuilder,
    dyn_abi::DynSolValue,
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, TxHash},
    providers::Provider,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use tracing::info;

/// A contract that has been deployed and confirmed on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    pub name: String,
    pub address: Address,
    pub tx_hash: Option<TxHash>,
}

/// Knows how to deploy one contract given its constructor arguments.
#[async_trait]
pub trait ContractFactory: Send + Sync {
    fn name(&self) -> &str;

    /// Submits the creation transaction and waits until it is mined.
    async fn deploy(&self, args: Vec<DynSolValue>) -> Result<DeployedContract, DeployError>;
}

/// Maps a contract name to a deployable factory.
pub trait FactoryResolver {
    type Factory: ContractFactory;

    fn get_contract_factory(&self, name: &str) -> Result<Self::Factory, DeployError>;
}

pub struct ArtifactFactory<P> {
    artifact: Artifact,
    provider: P,
    max_gas: Option<u64>,
}

impl<P> ArtifactFactory<P> {
    pub fn new(artifact: Artifact, provider: P, max_gas: Option<u64>) -> Self {
        Self {
            artifact,
            provider,
            max_gas,
        }
    }
}

#[async_trait]
impl<P> ContractFactory for ArtifactFactory<P>
where
    P: Provider<Http<Client>, Ethereum> + Clone,
{
    fn name(&self) -> &str {
        &self.artifact.name
    }

    async fn deploy(&self, args: Vec<DynSolValue>) -> Result<DeployedContract, DeployError> {
        let name = self.name();
        let input = self.artifact.deploy_data(&args)?;

        let mut call =
            RawCallBuilder::<Http<Client>, _, Ethereum>::new_raw_deploy(&self.provider, input);
        if let Some(gas) = self.max_gas {
            call = call.gas(gas);
        }

        let pending = call
            .send()
            .await
            .map_err(|e| DeployError::transaction(name, e))?;
        let tx_hash = *pending.tx_hash();
        info!("Submitted {} deployment in transaction {}", name, tx_hash);

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| DeployError::transaction(name, e))?;
        if !receipt.status() {
            return Err(DeployError::Reverted {
                name: name.to_string(),
                tx_hash,
            });
        }
        let address = receipt
            .contract_address()
            .ok_or_else(|| DeployError::MissingContractAddress {
                name: name.to_string(),
                tx_hash,
            })?;

        Ok(DeployedContract {
            name: name.to_string(),
            address,
            tx_hash: Some(tx_hash),
        })
    }
}

/// Resolves factories from compiled artifacts and binds them to a signing
/// provider.
pub struct ArtifactResolver<P> {
    store: ArtifactStore,
    provider: P,
    max_gas: Option<u64>,
}

impl<P> ArtifactResolver<P> {
    pub fn new(store: ArtifactStore, provider: P, max_gas: Option<u64>) -> Self {
        Self {
            store,
            provider,
            max_gas,
        }
    }
}

impl<P> FactoryResolver for ArtifactResolver<P>
where
    P: Provider<Http<Client>, Ethereum> + Clone,
{
    type Factory = ArtifactFactory<P>;

    fn get_contract_factory(&self, name: &str) -> Result<Self::Factory, DeployError> {
        let artifact = self.store.find(name)?;
        info!(
            "Loaded {} from {}",
            artifact.name,
            artifact.path.display()
        );
        Ok(ArtifactFactory::new(
            artifact,
            self.provider.clone(),
            self.max_gas,
        ))
    }
}
