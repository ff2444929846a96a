use anyhow::{Context, Result};
use clap::Parser;
use deployer::{
    artifact::ArtifactStore,
    checkpoint::{Checkpointer, DeploymentRecord},
    cli::DeployConfig,
    deployer::{deploy_marketplace, Deployment},
    env::{check_chain_id, create_provider, fetch_chain_id, init_console_subscriber},
    factory::ArtifactResolver,
};
use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr;
use tracing::info;

/// Where and for which chain the deployment record is written.
struct RecordTarget {
    checkpointer: Checkpointer,
    chain_id: u64,
}

async fn deploy_contracts(config: &DeployConfig) -> Result<(Deployment, Option<RecordTarget>)> {
    info!("{}", serde_json::to_string_pretty(config)?);

    let owner = PrivateKeySigner::from_str(config.base.owner_key.as_str())
        .context("invalid owner key")?;
    info!("Deploying from {}", owner.address());
    let node_url = config.node_url()?;
    let provider = create_provider(node_url, owner);

    // Everything the record needs is settled up front so that nothing after
    // the deployments can fail except the final write.
    let checkpointer = config.output.as_ref().map(Checkpointer::new);
    if let Some(checkpointer) = &checkpointer {
        checkpointer.prepare()?;
    }
    let chain_id = match (config.base.chain_id, &checkpointer) {
        (Some(expected), _) => {
            let actual = fetch_chain_id(&provider).await?;
            check_chain_id(actual, expected)?;
            Some(actual)
        }
        (None, Some(_)) => Some(fetch_chain_id(&provider).await?),
        (None, None) => None,
    };

    let resolver = ArtifactResolver::new(
        ArtifactStore::new(&config.base.artifacts_dir),
        provider,
        config.base.max_gas,
    );
    let deployment = deploy_marketplace(&resolver, &config.contract_names()).await?;

    let target = checkpointer.zip(chain_id).map(|(checkpointer, chain_id)| RecordTarget {
        checkpointer,
        chain_id,
    });
    Ok((deployment, target))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = DeployConfig::parse();
    init_console_subscriber();
    let (deployment, target) = deploy_contracts(&config)
        .await
        .context("deployment failed")?;
    println!("{}", deployment);

    if let Some(RecordTarget {
        checkpointer,
        chain_id,
    }) = target
    {
        checkpointer
            .save(&DeploymentRecord::new(chain_id, &deployment))
            .context("contracts deployed but the deployment record could not be written")?;
    }
    Ok(())
}
