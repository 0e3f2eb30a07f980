//! # Synchronous notification bus.
//!
//! [`Bus`] delivers each [`Notification`] to every registered subscriber,
//! in registration order, on the publisher's own task.
//!
//! ## Architecture
//! ```text
//! Publisher (one):                 Subscribers (ordered):
//!   ConnectionSupervisor ──► Bus::publish(&n) ──► sub[0].on_notification(&n)
//!   (inside transition lock)                 ──► sub[1].on_notification(&n)
//!                                            ──► sub[N].on_notification(&n)
//!   ◄──────────── returns after the last handler finished ────────────
//! ```
//!
//! ## Rules
//! - **Inline delivery**: `publish()` awaits each handler in turn; nothing is queued.
//! - **At most once**: a notification is handed to each subscriber once, never retried.
//! - **Panic isolation**: a panicking handler is caught, logged, and skipped;
//!   later subscribers still receive the notification.
//! - **No persistence**: a bus without subscribers drops notifications.

use std::sync::Arc;

use futures::FutureExt;

use super::event::Notification;
use crate::subscribers::Subscribe;

/// Ordered, synchronous fan-out of notifications.
///
/// Cheap to clone (subscribers are shared through an `Arc`).
#[derive(Clone, Default)]
pub struct Bus {
    subscribers: Arc<[Arc<dyn Subscribe>]>,
}

impl Bus {
    /// Creates a bus that delivers to `subscribers` in the given order.
    pub fn new(subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        Self {
            subscribers: subscribers.into(),
        }
    }

    /// Delivers the notification to every subscriber and returns once all handled it.
    pub async fn publish(&self, notification: &Notification) {
        for sub in self.subscribers.iter() {
            let fut = sub.on_notification(notification);
            if let Err(panic) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                tracing::error!(
                    subscriber = sub.name(),
                    seq = notification.seq,
                    kind = notification.as_label(),
                    panic = %panic_message(panic.as_ref()),
                    "subscriber panicked while handling notification"
                );
            }
        }
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
