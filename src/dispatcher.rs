use std::sync::Arc;

use itertools::Itertools;
use tokio::sync::{mpsc, Semaphore};

use crate::balance::{Address, BalanceResult, BalanceResults};
use crate::fetcher::BalanceFetcher;

/// Fetches the balance of every address with at most `concurrency` requests in flight.
///
/// Each address gets its own task. Tasks send `(address, result)` to this function, which
/// owns the results map and logs one progress line per write. Returns once every task has
/// finished, so every input address has exactly one entry.
pub async fn run<F>(
    addresses: Vec<Address>,
    fetcher: Arc<F>,
    concurrency: usize,
) -> BalanceResults
where
    F: BalanceFetcher + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    tracing::info!(
        "Checking {} addresses ({} distinct) with {} workers",
        addresses.len(),
        addresses.iter().unique().count(),
        concurrency
    );

    let permits = Arc::new(Semaphore::new(concurrency));
    let (sender, mut receiver) = mpsc::unbounded_channel::<(Address, BalanceResult)>();

    let mut tasks = Vec::with_capacity(addresses.len());
    for address in addresses {
        let permits = permits.clone();
        let fetcher = fetcher.clone();
        let sender = sender.clone();
        let task_address = address.clone();
        let handle = tokio::spawn(async move {
            // the semaphore is never closed, so this always holds a permit
            let _permit = permits.acquire_owned().await;
            let result = fetcher.fetch(&task_address).await;
            // the receiver outlives every task
            let _ = sender.send((task_address, result));
        });
        tasks.push((address, handle));
    }
    drop(sender);

    let mut results = BalanceResults::new();
    while let Some((address, result)) = receiver.recv().await {
        tracing::info!("Address: {}, Balance: {} XRP", address, result);
        results.insert(address, result);
    }

    for (address, handle) in tasks {
        if let Err(err) = handle.await {
            tracing::error!("balance task for {} did not complete: {}", address, err);
            results
                .entry(address)
                .or_insert_with(|| BalanceResult::failure(err));
        }
    }

    results
}
