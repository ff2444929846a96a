use crate::error::DeployError;
use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::{Client, Http},
};
use time::macros::format_description;
use tracing::info;
use tracing_subscriber::{
    fmt::{format::FmtSpan, time::UtcTime},
    EnvFilter,
};
use url::Url;

/// Initialize the console subscriber for logging. Logs go to stderr, stdout is
/// reserved for the deployed addresses.
pub fn init_console_subscriber() {
    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day]T[hour repr:24]:[minute]:[second].[subsecond digits:3]Z"
    ));
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_span_events(FmtSpan::CLOSE)
        .with_timer(timer)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_level(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .init();
}

pub fn create_provider(
    node_url: Url,
    signer: PrivateKeySigner,
) -> impl Provider<Http<Client>, Ethereum> + Clone {
    let wallet = EthereumWallet::from(signer);
    ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_http(node_url)
}

pub async fn fetch_chain_id(
    provider: &impl Provider<Http<Client>, Ethereum>,
) -> Result<u64, DeployError> {
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| DeployError::Rpc(e.into()))?;
    info!("Connected to chain {}", chain_id);
    Ok(chain_id)
}

/// Fails when the node reports a chain id other than the configured one.
pub fn check_chain_id(actual: u64, expected: u64) -> Result<(), DeployError> {
    if actual != expected {
        return Err(DeployError::ChainMismatch { expected, actual });
    }
    Ok(())
}
