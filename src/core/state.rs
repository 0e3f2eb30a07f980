//! # Connection state machine.
//!
//! [`ConnectionState`] holds the composite fields that change together
//! (attempt count, pause window, pending-recovery flag). It is owned by the
//! supervisor and only touched under its transition lock; the `connected`
//! flag lives beside it as an atomic so readers never take that lock.
//!
//! ## Transitions
//! ```text
//!                    success
//!   Disconnected ───────────────► Connected
//!     │  ▲   │                        │
//!     │  │   │ failure                │ probe failure
//!     │  │   └─► attempts += 1 ──┐    ▼
//!     │  └──────────────────────-┘  Disconnected (attempts = 0)
//!     │ attempts >= max
//!     ▼
//!   Paused ── now >= until ──► Disconnected (attempts = 0), retried same cycle
//! ```
//!
//! ## Invariants
//! - connected ⇒ `attempts == 0` and `paused_until == None`
//! - `paused_until.is_some()` ⇒ not connected
//! - `attempts <= max_attempts`

use chrono::{DateTime, TimeDelta, Utc};

/// What the current attempt cycle should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Nothing to do; the broker is reachable.
    AlreadyConnected,
    /// Inside the pause window; no attempt.
    StillPaused { until: DateTime<Utc> },
    /// Budget spent; the pause window was just opened.
    EnterPause { until: DateTime<Utc> },
    /// Call the connection factory.
    Attempt,
}

/// Supervisor-owned composite state.
#[derive(Debug, Clone, Default)]
pub(crate) struct ConnectionState {
    /// Consecutive failed attempts since the last success or reset.
    pub(crate) attempts: u32,
    /// End of the active pause window.
    pub(crate) paused_until: Option<DateTime<Utc>>,
    /// The next success reports as a recovery even with `attempts == 0`.
    pub(crate) recovery_pending: bool,
}

impl ConnectionState {
    /// Decides the step for one attempt cycle and applies the bookkeeping
    /// that precedes it (pause expiry, pause entry).
    pub(crate) fn plan(
        &mut self,
        connected: bool,
        now: DateTime<Utc>,
        max_attempts: u32,
        pause: TimeDelta,
    ) -> Step {
        if connected {
            return Step::AlreadyConnected;
        }

        if let Some(until) = self.paused_until {
            if now < until {
                return Step::StillPaused { until };
            }
            // Expiry is a reset point, not a failure.
            self.paused_until = None;
            self.recovery_pending = true;
            self.attempts = 0;
        }

        if self.attempts >= max_attempts {
            let until = now.checked_add_signed(pause).unwrap_or(if pause < TimeDelta::zero() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });
            self.paused_until = Some(until);
            return Step::EnterPause { until };
        }

        Step::Attempt
    }

    /// End of the pause window if it is still running at `now`.
    pub(crate) fn active_pause(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.paused_until.filter(|until| now < *until)
    }

    /// Applies a successful connection; returns whether it is a recovery.
    pub(crate) fn record_success(&mut self) -> bool {
        let recovery = self.attempts > 0 || self.recovery_pending;
        self.attempts = 0;
        self.paused_until = None;
        self.recovery_pending = false;
        recovery
    }

    /// Applies a failed attempt; returns the new attempt count.
    pub(crate) fn record_failure(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    /// Applies a live-probe failure on a connection believed up.
    pub(crate) fn record_probe_failure(&mut self) {
        self.attempts = 0;
        self.paused_until = None;
        self.recovery_pending = true;
    }

    /// Gives an operator a fresh attempt budget.
    ///
    /// Discarded failures still make the next success a recovery.
    pub(crate) fn reset_for_manual(&mut self) {
        if self.attempts > 0 {
            self.recovery_pending = true;
        }
        self.attempts = 0;
    }
}
