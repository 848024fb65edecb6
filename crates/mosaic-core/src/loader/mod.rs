//! # Mosaic Core Loaders
//!
//! Collaborators run during the external loading stage of bootstrap: imagery,
//! remote datasets and similar. They may fail freely; a failure is logged and
//! never aborts bootstrap.
use std::fmt::Debug;
use std::future::Future;

use async_trait::async_trait;
use futures::future::join_all;

use crate::kernel::error::Result;
use crate::service::ServiceRegistry;

/// Asynchronous data loader invoked once, after components are initialized.
#[async_trait]
pub trait AsyncLoader: Send + Sync + Debug {
    fn name(&self) -> &str;

    /// Load data, typically into a service looked up from `services`.
    async fn load(&self, services: &ServiceRegistry) -> Result<()>;
}

/// Await a batch of labelled futures together and keep only the successes.
///
/// Results keep the order of the batch. Each failure is logged with its label
/// and dropped; the batch itself never fails. There is no timeout.
pub async fn settle_all<T, F, I>(batch: I) -> Vec<T>
where
    I: IntoIterator<Item = (String, F)>,
    F: Future<Output = Result<T>>,
{
    let (labels, futures): (Vec<String>, Vec<F>) = batch.into_iter().unzip();
    let total = futures.len();

    let settled: Vec<T> = join_all(futures)
        .await
        .into_iter()
        .zip(labels)
        .filter_map(|(result, label)| match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("'{}' failed and was skipped: {}", label, e);
                None
            }
        })
        .collect();

    if settled.len() < total {
        log::warn!("{} of {} tasks in batch failed", total - settled.len(), total);
    }
    settled
}
