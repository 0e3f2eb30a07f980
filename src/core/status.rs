//! # Read-side views of the supervisor.
//!
//! - [`ConnectionStatus`]: the status surface `{connected, currentAttempts, pausedUntil}`.
//! - [`ProbeReport`]: result of a one-shot diagnostic connection test.
//! - [`Connectivity`]: a cheap, lock-free handle on the connected flag, for hot-path
//!   checks such as the send guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of the supervisor state, as exposed by a status endpoint.
///
/// ```rust
/// use mqvisor::ConnectionStatus;
///
/// let json = serde_json::to_value(ConnectionStatus::default()).unwrap();
/// assert_eq!(json["connected"], false);
/// assert_eq!(json["currentAttempts"], 0);
/// assert!(json["pausedUntil"].is_null());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    /// Whether the broker is believed reachable.
    pub connected: bool,
    /// Consecutive failed attempts.
    pub current_attempts: u32,
    /// End of the pause window, if paused.
    pub paused_until: Option<DateTime<Utc>>,
}

/// Outcome of [`ConnectionSupervisor::test_connection`](crate::ConnectionSupervisor::test_connection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// Whether a throwaway connection could be opened and started.
    pub connected: bool,
    /// Wall time spent on the probe.
    pub elapsed_ms: u64,
    /// Stable error label when the probe failed.
    pub error_label: Option<&'static str>,
    /// Error detail when the probe failed.
    pub error: Option<String>,
}

/// Read-only handle on the supervisor's connected flag.
#[derive(Debug, Clone)]
pub struct Connectivity {
    flag: Arc<AtomicBool>,
}

impl Connectivity {
    pub(crate) fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    /// Whether the broker is believed reachable right now.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
