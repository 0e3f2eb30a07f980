//! # Notification subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for reacting to connectivity
//! notifications. The [`ConsumerCoordinator`](crate::ConsumerCoordinator) is
//! the main implementor; [`LogWriter`](crate::LogWriter) is another.
//!
//! ## Rules
//! - Handlers run **on the publisher's task**, inside the supervisor's
//!   transition; the supervisor waits for every handler before returning.
//! - Each notification is delivered at most once; there is no queue and no retry.
//! - Handlers must catch their own errors. A panic is caught by the bus and
//!   logged, but the handler's work for that notification is lost.
//! - Handlers may read supervisor state (`is_connected`, `status`) but must not
//!   call `attempt_connect`, `trigger_manual_reconnect` or
//!   `check_connection_status`: those wait on the lock held by the publisher.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use mqvisor::{Notification, Subscribe};
//!
//! struct Alerts;
//!
//! #[async_trait]
//! impl Subscribe for Alerts {
//!     async fn on_notification(&self, n: &Notification) {
//!         if n.is_paused() {
//!             // page someone
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "alerts" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Notification;

/// Connectivity notification handler.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single notification.
    ///
    /// Keep it short and non-blocking: the supervisor's caller waits for it.
    async fn on_notification(&self, notification: &Notification);

    /// Returns the subscriber name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
