//! # Closure-backed consumer (`TaskConsumer`)
//!
//! [`TaskConsumer`] wraps a closure `F: Fn(CancellationToken) -> Fut` and runs a
//! fresh future on the tokio runtime every time it is started. The future is the
//! listener loop: it should receive messages until its token is cancelled.
//!
//! ## Lifecycle
//! ```text
//! start() ── running? ──yes──► Ok
//!               │ no
//!               └─► new token + tokio::spawn(f(token))
//!
//! stop()  ── running? ──no───► Ok
//!               │ yes
//!               └─► cancel token → join (bounded by stop_timeout)
//!                     └─ timed out → abort task, Err(Stop)
//! ```
//! A body that returns on its own leaves the consumer stopped; the next
//! `start` spawns it again.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use mqvisor::{Consumer, ConsumerRef, TaskConsumer};
//!
//! let c: ConsumerRef = TaskConsumer::arc("orders-listener", |token: CancellationToken| async move {
//!     token.cancelled().await;
//! });
//!
//! assert_eq!(c.id(), "orders-listener");
//! assert!(!c.is_running());
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::consumer::Consumer;
use crate::error::ConsumerError;

const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

struct Running {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

/// Function-backed consumer.
pub struct TaskConsumer<F> {
    id: Cow<'static, str>,
    f: F,
    stop_timeout: Duration,
    running: Mutex<Option<Running>>,
}

impl<F> TaskConsumer<F> {
    /// Creates a new function-backed consumer.
    pub fn new(id: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            id: id.into(),
            f,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            running: Mutex::new(None),
        }
    }

    /// Creates the consumer and returns it as a shared handle.
    pub fn arc(id: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(id, f))
    }

    /// How long `stop` waits for the body to exit before aborting it (default 5s).
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl<F, Fut> Consumer for TaskConsumer<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn start(&self) -> Result<(), ConsumerError> {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|r| !r.join.is_finished()) {
            return Ok(());
        }

        let cancel = CancellationToken::new();
        let join = tokio::spawn((self.f)(cancel.clone()));
        *slot = Some(Running { cancel, join });
        tracing::debug!(consumer = %self.id, "consumer started");
        Ok(())
    }

    async fn stop(&self) -> Result<(), ConsumerError> {
        let Some(Running { cancel, mut join }) = self.slot().take() else {
            return Ok(());
        };

        cancel.cancel();
        match tokio::time::timeout(self.stop_timeout, &mut join).await {
            Ok(Ok(())) => {
                tracing::debug!(consumer = %self.id, "consumer stopped");
                Ok(())
            }
            Ok(Err(e)) if e.is_panic() => {
                tracing::warn!(consumer = %self.id, "consumer body had panicked; now stopped");
                Ok(())
            }
            Ok(Err(_)) => Ok(()),
            Err(_) => {
                join.abort();
                Err(ConsumerError::Stop {
                    id: self.id.to_string(),
                    reason: format!(
                        "did not exit within {:?} of cancellation; aborted",
                        self.stop_timeout
                    ),
                })
            }
        }
    }

    fn is_running(&self) -> bool {
        self.slot().as_ref().is_some_and(|r| !r.join.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_start_stop_are_idempotent() {
        let spawns = Arc::new(AtomicUsize::new(0));
        let s = spawns.clone();
        let c = TaskConsumer::new("q1", move |token: CancellationToken| {
            s.fetch_add(1, Ordering::SeqCst);
            async move { token.cancelled().await }
        });

        c.stop().await.unwrap();
        assert!(!c.is_running());

        c.start().await.unwrap();
        c.start().await.unwrap();
        assert!(c.is_running());
        assert_eq!(spawns.load(Ordering::SeqCst), 1);

        c.stop().await.unwrap();
        c.stop().await.unwrap();
        assert!(!c.is_running());

        c.start().await.unwrap();
        assert_eq!(spawns.load(Ordering::SeqCst), 2);
        c.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_finished_body_is_not_running() {
        let c = TaskConsumer::new("oneshot", |_token: CancellationToken| async {});
        c.start().await.unwrap();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert!(!c.is_running());
        c.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_body_is_aborted() {
        let c = TaskConsumer::new("stuck", |_token: CancellationToken| async {
            std::future::pending::<()>().await
        })
        .with_stop_timeout(Duration::from_millis(50));

        c.start().await.unwrap();
        let err = c.stop().await.unwrap_err();
        assert_eq!(err.as_label(), "consumer_stop_failed");
        assert!(!c.is_running());
    }
}
