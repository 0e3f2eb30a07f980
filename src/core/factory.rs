//! # Broker connection capability.
//!
//! The supervisor does not speak any broker protocol. It consumes an opaque
//! [`ConnectionFactory`] that either hands back a live [`Connection`] or a
//! typed [`ConnectError`]. Factories carry no retry logic and bound their own
//! blocking time; all retry policy lives in the supervisor.

use async_trait::async_trait;

use crate::error::ConnectError;

/// A live broker connection.
#[async_trait]
pub trait Connection: Send {
    /// Starts delivery on the connection, proving the broker accepts it.
    async fn start(&mut self) -> Result<(), ConnectError>;

    /// Releases the connection.
    async fn close(&mut self) -> Result<(), ConnectError>;
}

/// Opens broker connections.
#[async_trait]
pub trait ConnectionFactory: Send + Sync + 'static {
    /// Opens a new connection or reports why it could not.
    async fn open(&self) -> Result<Box<dyn Connection>, ConnectError>;
}

/// Opens, starts and closes a throwaway connection.
///
/// A failing `close` does not fail the probe: the broker already accepted us.
pub(crate) async fn probe(factory: &dyn ConnectionFactory) -> Result<(), ConnectError> {
    let mut conn = factory.open().await?;
    let started = conn.start().await;
    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, label = e.as_label(), "closing probe connection failed");
    }
    started
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Conn {
        start_ok: bool,
        closed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Connection for Conn {
        async fn start(&mut self) -> Result<(), ConnectError> {
            if self.start_ok {
                Ok(())
            } else {
                Err(ConnectError::NotAuthorized {
                    reason: "channel rejected".into(),
                })
            }
        }

        async fn close(&mut self) -> Result<(), ConnectError> {
            self.closed.store(true, Ordering::SeqCst);
            Err(ConnectError::unavailable("already gone"))
        }
    }

    struct Factory {
        start_ok: bool,
        closed: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ConnectionFactory for Factory {
        async fn open(&self) -> Result<Box<dyn Connection>, ConnectError> {
            Ok(Box::new(Conn {
                start_ok: self.start_ok,
                closed: self.closed.clone(),
            }))
        }
    }

    #[tokio::test]
    async fn test_probe_ignores_close_failure() {
        let closed = Arc::new(AtomicBool::new(false));
        let f = Factory { start_ok: true, closed: closed.clone() };
        assert!(probe(&f).await.is_ok());
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_probe_closes_after_failed_start() {
        let closed = Arc::new(AtomicBool::new(false));
        let f = Factory { start_ok: false, closed: closed.clone() };
        let err = probe(&f).await.unwrap_err();
        assert_eq!(err.as_label(), "connect_not_authorized");
        assert!(closed.load(Ordering::SeqCst));
    }
}
