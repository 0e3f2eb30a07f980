//! # Consumer registry: the in-process [`ConsumerPool`].
//!
//! Holds consumers by id. Lookups clone the handle out of the map and release
//! the lock before calling into the consumer, so a slow `stop` never blocks
//! registration or listing.
//!
//! ## Rules
//! - Ids are unique; a second `register` with the same id is rejected.
//! - `deregister` stops the consumer before removing it.
//! - `list_ids` is sorted, so bulk sweeps visit consumers in a stable order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{consumer::ConsumerRef, pool::ConsumerPool};
use crate::error::ConsumerError;

/// Registry of consumers addressable by id.
#[derive(Default)]
pub struct ConsumerRegistry {
    consumers: RwLock<HashMap<String, ConsumerRef>>,
}

impl ConsumerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Adds a consumer; it is not started.
    pub async fn register(&self, consumer: ConsumerRef) -> Result<(), ConsumerError> {
        let id = consumer.id().to_string();
        let mut map = self.consumers.write().await;
        if map.contains_key(&id) {
            return Err(ConsumerError::AlreadyRegistered { id });
        }
        tracing::debug!(consumer = %id, "consumer registered");
        map.insert(id, consumer);
        Ok(())
    }

    /// Stops and removes a consumer.
    ///
    /// The consumer is removed even if stopping it failed; the stop error is returned.
    pub async fn deregister(&self, id: &str) -> Result<(), ConsumerError> {
        let consumer = self.get(id).await?;
        let stopped = consumer.stop().await;
        self.consumers.write().await.remove(id);
        tracing::debug!(consumer = %id, "consumer deregistered");
        stopped
    }

    /// Handle for one consumer.
    pub async fn get(&self, id: &str) -> Result<ConsumerRef, ConsumerError> {
        self.consumers
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ConsumerError::NotFound { id: id.to_string() })
    }

    /// Number of registered consumers.
    pub async fn len(&self) -> usize {
        self.consumers.read().await.len()
    }

    /// True if nothing is registered.
    pub async fn is_empty(&self) -> bool {
        self.consumers.read().await.is_empty()
    }
}

#[async_trait]
impl ConsumerPool for ConsumerRegistry {
    async fn list_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.consumers.read().await.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    async fn start(&self, id: &str) -> Result<(), ConsumerError> {
        self.get(id).await?.start().await
    }

    async fn stop(&self, id: &str) -> Result<(), ConsumerError> {
        self.get(id).await?.stop().await
    }

    async fn is_running(&self, id: &str) -> Result<bool, ConsumerError> {
        Ok(self.get(id).await?.is_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeConsumer;

    #[tokio::test]
    async fn test_register_rejects_duplicates() {
        let reg = ConsumerRegistry::new();
        reg.register(FakeConsumer::arc("a")).await.unwrap();
        let err = reg.register(FakeConsumer::arc("a")).await.unwrap_err();
        assert_eq!(err, ConsumerError::AlreadyRegistered { id: "a".into() });
        assert_eq!(reg.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_ids_sorted() {
        let reg = ConsumerRegistry::new();
        for id in ["c", "a", "b"] {
            reg.register(FakeConsumer::arc(id)).await.unwrap();
        }
        assert_eq!(reg.list_ids().await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let reg = ConsumerRegistry::new();
        assert_eq!(reg.start("x").await.unwrap_err().as_label(), "consumer_not_found");
        assert_eq!(reg.is_running("x").await.unwrap_err().as_label(), "consumer_not_found");
    }

    #[tokio::test]
    async fn test_deregister_stops_first() {
        let reg = ConsumerRegistry::new();
        let c = FakeConsumer::arc("a");
        reg.register(c.clone()).await.unwrap();
        reg.start("a").await.unwrap();
        assert!(c.is_running_now());

        reg.deregister("a").await.unwrap();
        assert!(!c.is_running_now());
        assert!(reg.is_empty().await);
    }

    #[tokio::test]
    async fn test_bulk_collects_failures_and_continues() {
        let reg = ConsumerRegistry::new();
        let bad = FakeConsumer::arc("b");
        bad.fail_starts(1);
        let good = FakeConsumer::arc("c");
        reg.register(FakeConsumer::arc("a")).await.unwrap();
        reg.register(bad.clone()).await.unwrap();
        reg.register(good.clone()).await.unwrap();

        let err = reg.start_all().await.unwrap_err();
        assert_eq!(err, ConsumerError::Bulk { failed: vec!["b".into()] });
        assert!(good.is_running_now());
        assert!(!bad.is_running_now());

        reg.stop_all().await.unwrap();
        assert!(!good.is_running_now());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_all_waits_for_slowest_not_sum() {
        use crate::consumers::TaskConsumer;
        use std::time::Duration;
        use tokio_util::sync::CancellationToken;

        let reg = ConsumerRegistry::new();
        for id in ["a", "b", "c", "d"] {
            let stuck = TaskConsumer::new(id, |_token: CancellationToken| std::future::pending::<()>())
                .with_stop_timeout(Duration::from_secs(2));
            reg.register(Arc::new(stuck)).await.unwrap();
        }
        reg.start_all().await.unwrap();

        let started = tokio::time::Instant::now();
        let err = reg.stop_all().await.unwrap_err();
        let elapsed = started.elapsed();

        assert_eq!(
            err,
            ConsumerError::Bulk {
                failed: vec!["a".into(), "b".into(), "c".into(), "d".into()]
            }
        );
        assert!(elapsed < Duration::from_secs(3), "stop_all took {elapsed:?}");
        for id in reg.list_ids().await {
            assert!(!reg.is_running(&id).await.unwrap());
        }
    }
}
