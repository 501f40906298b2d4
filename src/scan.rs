use std::sync::Arc;

use crate::address_file::{load_addresses, save_results, SaveSummary};
use crate::config::Config;
use crate::dispatcher;
use crate::fetcher::{BalanceFetcher, RippledFetcher};

/// Load addresses, check every balance against the configured endpoint, save the positive ones.
pub async fn scan(config: &Config) -> anyhow::Result<Option<SaveSummary>> {
    let fetcher = Arc::new(RippledFetcher::new(config));
    scan_with(config, fetcher).await
}

pub async fn scan_with<F>(config: &Config, fetcher: Arc<F>) -> anyhow::Result<Option<SaveSummary>>
where
    F: BalanceFetcher + ?Sized + 'static,
{
    tracing::info!("Reading addresses from {:?}", config.input_path);
    let addresses = load_addresses(&config.input_path)?;

    let results = dispatcher::run(addresses, fetcher, config.concurrency).await;

    Ok(save_results(&results, &config.output_path))
}
