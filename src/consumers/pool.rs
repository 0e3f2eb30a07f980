//! # Consumer pool capability.
//!
//! [`ConsumerPool`] is what the coordinator drives: list the consumers, start or
//! stop one by id, ask whether one runs. The bulk operations have default
//! implementations that drive every id concurrently and collect the failures
//! into a single [`ConsumerError::Bulk`]. A bulk call therefore takes as long
//! as its slowest consumer, not the sum of all of them.

use async_trait::async_trait;
use futures::future::join_all;

use crate::error::ConsumerError;

/// Addressable set of consumers.
#[async_trait]
pub trait ConsumerPool: Send + Sync + 'static {
    /// Ids of every registered consumer.
    async fn list_ids(&self) -> Vec<String>;

    /// Starts one consumer. Idempotent.
    async fn start(&self, id: &str) -> Result<(), ConsumerError>;

    /// Stops one consumer. Idempotent.
    async fn stop(&self, id: &str) -> Result<(), ConsumerError>;

    /// Whether one consumer is running.
    async fn is_running(&self, id: &str) -> Result<bool, ConsumerError>;

    /// Starts every consumer concurrently; one failure does not stop the others.
    async fn start_all(&self) -> Result<(), ConsumerError> {
        let ids = self.list_ids().await;
        let results = join_all(ids.iter().map(|id| self.start(id))).await;
        bulk_result("start", ids, results)
    }

    /// Stops every consumer concurrently; one failure does not stop the others.
    async fn stop_all(&self) -> Result<(), ConsumerError> {
        let ids = self.list_ids().await;
        let results = join_all(ids.iter().map(|id| self.stop(id))).await;
        bulk_result("stop", ids, results)
    }
}

fn bulk_result(
    op: &'static str,
    ids: Vec<String>,
    results: Vec<Result<(), ConsumerError>>,
) -> Result<(), ConsumerError> {
    let mut failed = Vec::new();
    for (id, res) in ids.into_iter().zip(results) {
        if let Err(e) = res {
            tracing::warn!(consumer = %id, op, error = %e, "consumer operation failed");
            failed.push(id);
        }
    }
    if failed.is_empty() {
        Ok(())
    } else {
        Err(ConsumerError::Bulk { failed })
    }
}
