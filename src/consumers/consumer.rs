//! # Consumer abstraction.
//!
//! A [`Consumer`] is one broker listener with a stable id that can be started
//! and stopped on demand. Both operations are idempotent: asking for the state
//! the consumer is already in returns `Ok(())`.
//!
//! The common handle type is [`ConsumerRef`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ConsumerError;

/// A startable, stoppable broker listener.
///
/// # Example
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use async_trait::async_trait;
/// use mqvisor::{Consumer, ConsumerError};
///
/// struct Listener { on: AtomicBool }
///
/// #[async_trait]
/// impl Consumer for Listener {
///     fn id(&self) -> &str { "orders" }
///
///     async fn start(&self) -> Result<(), ConsumerError> {
///         self.on.store(true, Ordering::SeqCst);
///         Ok(())
///     }
///
///     async fn stop(&self) -> Result<(), ConsumerError> {
///         self.on.store(false, Ordering::SeqCst);
///         Ok(())
///     }
///
///     fn is_running(&self) -> bool { self.on.load(Ordering::SeqCst) }
/// }
/// ```
#[async_trait]
pub trait Consumer: Send + Sync + 'static {
    /// Stable identifier, unique within a pool.
    fn id(&self) -> &str;

    /// Starts consuming. No-op if already running.
    async fn start(&self) -> Result<(), ConsumerError>;

    /// Stops consuming. No-op if already stopped.
    async fn stop(&self) -> Result<(), ConsumerError>;

    /// Whether the consumer is currently running.
    fn is_running(&self) -> bool;
}

/// Shared handle to a consumer.
pub type ConsumerRef = Arc<dyn Consumer>;
