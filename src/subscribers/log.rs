//! # LogWriter: notification logger
//!
//! A minimal subscriber that renders every [`Notification`] as one `tracing`
//! event under the `mqvisor::notifications` target.
//!
//! ## Example output
//! ```text
//! WARN  [paused] reason=backoff_exhausted until=2026-10-18T10:30:00Z seq=4
//! WARN  [paused] reason=probe_failure until=- seq=7
//! INFO  [resumed] recovery=true at=2026-10-18T10:30:05Z seq=8
//! ```

use async_trait::async_trait;

use crate::events::{Notification, NotificationKind};
use crate::subscribers::Subscribe;

/// Notification logging subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_notification(&self, n: &Notification) {
        match n.kind {
            NotificationKind::Paused { reason, until } => {
                let until = until.map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
                tracing::warn!(
                    target: "mqvisor::notifications",
                    "[paused] reason={} until={} seq={}",
                    reason.as_label(),
                    until,
                    n.seq
                );
            }
            NotificationKind::Resumed { recovery } => {
                tracing::info!(
                    target: "mqvisor::notifications",
                    "[resumed] recovery={} at={} seq={}",
                    recovery,
                    n.at.to_rfc3339(),
                    n.seq
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
