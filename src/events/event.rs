//! # Connectivity notifications emitted by the supervisor.
//!
//! Exactly one [`Notification`] is published per state transition that
//! subscribers must react to:
//! - [`NotificationKind::Paused`] consumers should stop now;
//! - [`NotificationKind::Resumed`] the broker is reachable, consumers should run.
//!
//! A `Paused` notification always says *why* through [`PauseReason`]:
//! an exhausted attempt budget carries the end of the pause window, a failed
//! live probe carries none.
//!
//! ## Ordering guarantees
//! Each notification has a globally unique sequence number (`seq`) that
//! increases monotonically.
//!
//! ## Example
//! ```rust
//! use chrono::Utc;
//! use mqvisor::{Notification, NotificationKind, PauseReason};
//!
//! let until = Utc::now();
//! let n = Notification::paused(PauseReason::BackoffExhausted, Some(until), Utc::now());
//!
//! assert!(n.is_paused());
//! assert_eq!(n.pause_reason(), Some(PauseReason::BackoffExhausted));
//! assert!(matches!(n.kind, NotificationKind::Paused { until: Some(_), .. }));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use chrono::{DateTime, Utc};

/// Global sequence counter for notification ordering.
static NOTIFICATION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Why consumers are being told to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseReason {
    /// The consecutive-failure budget was spent; attempts resume after the pause window.
    BackoffExhausted,
    /// A live-connection probe failed; reconnection starts on the next cycle.
    ProbeFailure,
}

impl PauseReason {
    /// Short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            PauseReason::BackoffExhausted => "backoff_exhausted",
            PauseReason::ProbeFailure => "probe_failure",
        }
    }
}

/// Classification of notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Consumers must stop.
    ///
    /// `until` is `Some` for [`PauseReason::BackoffExhausted`] and `None`
    /// for [`PauseReason::ProbeFailure`].
    Paused {
        /// Why the supervisor paused.
        reason: PauseReason,
        /// End of the pause window, if any.
        until: Option<DateTime<Utc>>,
    },

    /// A connection attempt succeeded.
    Resumed {
        /// `false` for a first-ever connection, `true` after failures, a pause
        /// or a probe-detected disconnect.
        recovery: bool,
    },
}

/// Notification published through the [`Bus`](crate::events::Bus).
#[derive(Debug, Clone)]
pub struct Notification {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock time of the transition (supervisor clock).
    pub at: DateTime<Utc>,
    /// What happened.
    pub kind: NotificationKind,
}

impl Notification {
    fn new(kind: NotificationKind, at: DateTime<Utc>) -> Self {
        Self {
            seq: NOTIFICATION_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at,
            kind,
        }
    }

    /// Creates a `Paused` notification.
    #[inline]
    pub fn paused(reason: PauseReason, until: Option<DateTime<Utc>>, at: DateTime<Utc>) -> Self {
        Self::new(NotificationKind::Paused { reason, until }, at)
    }

    /// Creates a `Resumed` notification.
    #[inline]
    pub fn resumed(recovery: bool, at: DateTime<Utc>) -> Self {
        Self::new(NotificationKind::Resumed { recovery }, at)
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        matches!(self.kind, NotificationKind::Paused { .. })
    }

    #[inline]
    pub fn is_resumed(&self) -> bool {
        matches!(self.kind, NotificationKind::Resumed { .. })
    }

    /// True only for a `Resumed` that follows failures or a pause.
    #[inline]
    pub fn is_recovery(&self) -> bool {
        matches!(self.kind, NotificationKind::Resumed { recovery: true })
    }

    /// Pause reason, when this is a `Paused` notification.
    #[inline]
    pub fn pause_reason(&self) -> Option<PauseReason> {
        match self.kind {
            NotificationKind::Paused { reason, .. } => Some(reason),
            NotificationKind::Resumed { .. } => None,
        }
    }

    /// Stable label for logs/metrics (`paused` / `resumed`).
    pub fn as_label(&self) -> &'static str {
        match self.kind {
            NotificationKind::Paused { .. } => "paused",
            NotificationKind::Resumed { .. } => "resumed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Notification::resumed(false, Utc::now());
        let b = Notification::resumed(true, Utc::now());
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_probe_pause_is_distinguishable() {
        let probe = Notification::paused(PauseReason::ProbeFailure, None, Utc::now());
        assert!(probe.is_paused());
        assert!(!probe.is_recovery());
        assert_eq!(probe.pause_reason(), Some(PauseReason::ProbeFailure));
        assert_eq!(probe.as_label(), "paused");
    }

    #[test]
    fn test_first_connection_is_not_recovery() {
        let first = Notification::resumed(false, Utc::now());
        assert!(first.is_resumed());
        assert!(!first.is_recovery());
        assert_eq!(first.pause_reason(), None);
    }
}
