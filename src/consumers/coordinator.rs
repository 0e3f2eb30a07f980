//! # ConsumerCoordinator: keeps the consumer pool in step with connectivity.
//!
//! Subscribes to supervisor notifications and drives a [`ConsumerPool`]:
//!
//! ```text
//! Paused{..}   → stop_all()  → converge(Stopped)
//! Resumed{..}  → start_all() → converge(Running)
//!
//! converge(target):
//!   for id in list_ids():
//!     state == target?  → next
//!     else one individual start/stop (all stragglers concurrently), re-check
//!   still off target    → warn (no further retries)
//! ```
//!
//! Nothing raised by the pool escapes: every failure is logged and the
//! handler returns normally, so a stuck consumer never disturbs the
//! supervisor's transition.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use super::pool::ConsumerPool;
use crate::{
    error::ConsumerError,
    events::{Notification, NotificationKind},
    subscribers::Subscribe,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Running,
    Stopped,
}

impl Target {
    fn is_running(self) -> bool {
        matches!(self, Target::Running)
    }

    fn as_label(self) -> &'static str {
        match self {
            Target::Running => "running",
            Target::Stopped => "stopped",
        }
    }
}

/// Starts and stops consumers in response to connectivity notifications.
pub struct ConsumerCoordinator {
    pool: Arc<dyn ConsumerPool>,
}

impl ConsumerCoordinator {
    /// Creates a coordinator over `pool`.
    pub fn new(pool: Arc<dyn ConsumerPool>) -> Arc<Self> {
        Arc::new(Self { pool })
    }

    /// Stops every consumer. Never fails.
    pub async fn on_paused(&self) {
        if let Err(e) = self.pool.stop_all().await {
            tracing::warn!(error = %e, label = e.as_label(), "bulk consumer stop incomplete");
        }
        self.converge(Target::Stopped).await;
    }

    /// Starts every consumer, then retries each straggler once. Never fails.
    pub async fn on_resumed(&self) {
        if let Err(e) = self.pool.start_all().await {
            tracing::warn!(error = %e, label = e.as_label(), "bulk consumer start incomplete");
        }
        self.converge(Target::Running).await;
    }

    async fn converge(&self, target: Target) {
        let mut off_target = Vec::new();
        for id in self.pool.list_ids().await {
            match self.pool.is_running(&id).await {
                Ok(running) if running == target.is_running() => {}
                Ok(_) => off_target.push(id),
                Err(e) => {
                    tracing::debug!(consumer = %id, error = %e, "consumer state unavailable; skipped");
                }
            }
        }
        if off_target.is_empty() {
            return;
        }

        tracing::info!(
            consumers = ?off_target,
            target = target.as_label(),
            "consumers off target after bulk operation; retrying individually"
        );
        let results = join_all(off_target.iter().map(|id| self.correct(id, target))).await;
        for (id, res) in off_target.iter().zip(results) {
            if let Err(e) = res {
                tracing::warn!(consumer = %id, error = %e, label = e.as_label(), "corrective call failed");
            }
        }

        let mut stragglers = Vec::new();
        for id in off_target {
            match self.pool.is_running(&id).await {
                Ok(running) if running == target.is_running() => {}
                _ => stragglers.push(id),
            }
        }
        if !stragglers.is_empty() {
            tracing::warn!(
                consumers = ?stragglers,
                target = target.as_label(),
                "consumers did not reach target state"
            );
        }
    }

    async fn correct(&self, id: &str, target: Target) -> Result<(), ConsumerError> {
        match target {
            Target::Running => self.pool.start(id).await,
            Target::Stopped => self.pool.stop(id).await,
        }
    }
}

#[async_trait]
impl Subscribe for ConsumerCoordinator {
    async fn on_notification(&self, n: &Notification) {
        match n.kind {
            NotificationKind::Paused { reason, .. } => {
                tracing::info!(reason = reason.as_label(), seq = n.seq, "stopping consumers");
                self.on_paused().await;
            }
            NotificationKind::Resumed { recovery } => {
                tracing::info!(recovery, seq = n.seq, "starting consumers");
                self.on_resumed().await;
            }
        }
    }

    fn name(&self) -> &'static str {
        "ConsumerCoordinator"
    }
}
