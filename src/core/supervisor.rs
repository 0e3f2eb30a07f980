//! # ConnectionSupervisor: connectivity state, retry budget and pause policy.
//!
//! The [`ConnectionSupervisor`] owns the broker connection state, decides when
//! to attempt, retry, pause and resume, and publishes a [`Notification`] on
//! every transition subscribers must react to.
//!
//! ## Key responsibilities
//! - serialize every state transition through one async mutex
//!   (scheduler tick, manual trigger and health probe never interleave)
//! - keep `connected` in an atomic so readers never wait on that mutex
//! - publish `Paused` / `Resumed` through the synchronous [`Bus`], inside the transition
//! - mirror each transition into a `watch` channel backing [`ConnectionSupervisor::status`]
//!
//! ## Attempt cycle
//! ```text
//! attempt_connect()
//!   lock state
//!   ├─ connected?                         → return
//!   ├─ paused and now <  until?           → return
//!   ├─ paused and now >= until?           → clear pause, attempts = 0, mark recovery
//!   ├─ attempts >= max?                   → paused_until = now + pause
//!   │                                        publish Paused{BackoffExhausted, until}
//!   └─ factory.open() + start() + close()
//!         ├─ Ok  → connected = true, attempts = 0
//!         │        publish Resumed{recovery = attempts > 0 || recovery pending}
//!         └─ Err → connected = false, attempts += 1   (silent)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use mqvisor::{Connection, ConnectionFactory, ConnectionSupervisor, ConnectError, SupervisorConfig};
//!
//! struct Unreachable;
//!
//! #[async_trait]
//! impl ConnectionFactory for Unreachable {
//!     async fn open(&self) -> Result<Box<dyn Connection>, ConnectError> {
//!         Err(ConnectError::unavailable("connection refused"))
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = ConnectionSupervisor::builder(SupervisorConfig::default(), Arc::new(Unreachable))
//!         .build()?;
//!
//!     sup.attempt_connect().await;
//!     assert!(!sup.is_connected());
//!     assert_eq!(sup.attempt_count(), 1);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};

use crate::{
    config::SupervisorConfig,
    core::{
        builder::SupervisorBuilder,
        clock::Clock,
        factory::{ConnectionFactory, probe},
        state::{ConnectionState, Step},
        status::{ConnectionStatus, Connectivity, ProbeReport},
    },
    events::{Bus, Notification, PauseReason},
};

/// Owns connection state and retry/pause policy; publishes connectivity notifications.
pub struct ConnectionSupervisor {
    cfg: SupervisorConfig,
    factory: Arc<dyn ConnectionFactory>,
    bus: Bus,
    clock: Arc<dyn Clock>,
    connected: Arc<AtomicBool>,
    state: Mutex<ConnectionState>,
    status: watch::Sender<ConnectionStatus>,
}

impl ConnectionSupervisor {
    /// Starts building a supervisor around `factory`.
    pub fn builder(cfg: SupervisorConfig, factory: Arc<dyn ConnectionFactory>) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg, factory)
    }

    pub(crate) fn new_internal(
        cfg: SupervisorConfig,
        factory: Arc<dyn ConnectionFactory>,
        bus: Bus,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (status, _) = watch::channel(ConnectionStatus::default());
        Self {
            cfg,
            factory,
            bus,
            clock,
            connected: Arc::new(AtomicBool::new(false)),
            state: Mutex::new(ConnectionState::default()),
            status,
        }
    }

    /// Runs one attempt cycle, waiting for any in-flight transition first.
    ///
    /// Blocks for the duration of the factory call. Never fails: connect errors
    /// are counted, budget exhaustion becomes a `Paused` notification.
    pub async fn attempt_connect(&self) {
        let mut state = self.state.lock().await;
        self.attempt_locked(&mut state).await;
    }

    /// Runs one attempt cycle unless another transition is in flight.
    ///
    /// Returns `false` when the cycle was skipped. The scheduler uses this so
    /// that a slow attempt delays the next tick instead of stacking a second one.
    pub async fn try_attempt_connect(&self) -> bool {
        match self.state.try_lock() {
            Ok(mut state) => {
                self.attempt_locked(&mut state).await;
                true
            }
            Err(_) => false,
        }
    }

    /// Operator-requested reconnect.
    ///
    /// A running pause cannot be overridden: no attempt, no notification.
    /// Otherwise the attempt budget is reset before running the cycle.
    pub async fn trigger_manual_reconnect(&self) {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        if let Some(until) = state.active_pause(now) {
            tracing::warn!(
                paused_until = %until,
                "manual reconnect ignored: reconnection is paused"
            );
            return;
        }

        tracing::info!(discarded_attempts = state.attempts, "manual reconnect triggered");
        state.reset_for_manual();
        self.attempt_locked(&mut state).await;
    }

    /// Probes a connection believed up; on failure marks it down and tells
    /// subscribers to stop consumers (`Paused{ProbeFailure}`, no window).
    pub async fn check_connection_status(&self) {
        if !self.is_connected() {
            return;
        }

        let mut state = self.state.lock().await;
        if !self.is_connected() {
            return;
        }

        match probe(self.factory.as_ref()).await {
            Ok(()) => tracing::trace!("health probe ok"),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    label = e.as_label(),
                    "health probe failed; marking connection down"
                );
                self.connected.store(false, Ordering::Release);
                state.record_probe_failure();
                self.publish_status(&state, false);

                let n = Notification::paused(PauseReason::ProbeFailure, None, self.clock.now());
                self.bus.publish(&n).await;
            }
        }
    }

    /// One-shot diagnostic connection test; never changes supervisor state.
    pub async fn test_connection(&self) -> ProbeReport {
        let started = Instant::now();
        let res = probe(self.factory.as_ref()).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match res {
            Ok(()) => ProbeReport {
                connected: true,
                elapsed_ms,
                error_label: None,
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, label = e.as_label(), "connection test failed");
                ProbeReport {
                    connected: false,
                    elapsed_ms,
                    error_label: Some(e.as_label()),
                    error: Some(e.as_message()),
                }
            }
        }
    }

    /// Whether the broker is believed reachable. Lock-free.
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Consecutive failed attempts, as of the last completed transition.
    pub fn attempt_count(&self) -> u32 {
        self.status.borrow().current_attempts
    }

    /// End of the pause window, as of the last completed transition.
    pub fn paused_until(&self) -> Option<DateTime<Utc>> {
        self.status.borrow().paused_until
    }

    /// Status snapshot for a status endpoint.
    ///
    /// The fields are written together, so prefer this over combining
    /// [`is_connected`](Self::is_connected) with [`attempt_count`](Self::attempt_count).
    /// The snapshot is published before the connected flag is raised.
    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Receiver that observes every status change, e.g. after a manual trigger.
    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.subscribe()
    }

    /// Lock-free handle on the connected flag, for send guards.
    pub fn connectivity(&self) -> Connectivity {
        Connectivity::new(Arc::clone(&self.connected))
    }

    /// Configuration this supervisor was built with.
    pub fn config(&self) -> &SupervisorConfig {
        &self.cfg
    }

    async fn attempt_locked(&self, state: &mut ConnectionState) {
        let now = self.clock.now();
        let max = self.cfg.max_reconnect_attempts;
        let step = state.plan(
            self.is_connected(),
            now,
            max,
            self.cfg.reconnect_pause(),
        );

        match step {
            Step::AlreadyConnected => {
                tracing::debug!("connection already active");
            }
            Step::StillPaused { until } => {
                tracing::warn!(paused_until = %until, "reconnection paused");
            }
            Step::EnterPause { until } => {
                tracing::warn!(
                    max_attempts = max,
                    pause_minutes = self.cfg.reconnect_pause_minutes,
                    paused_until = %until,
                    "max reconnect attempts reached; pausing reconnection"
                );
                self.publish_status(state, false);
                let n = Notification::paused(PauseReason::BackoffExhausted, Some(until), now);
                self.bus.publish(&n).await;
            }
            Step::Attempt => match probe(self.factory.as_ref()).await {
                Ok(()) => {
                    let recovery = state.record_success();
                    // Snapshot first: a reader that sees the flag up must not see stale attempts.
                    self.publish_status(state, true);
                    self.connected.store(true, Ordering::Release);
                    tracing::info!(recovery, "broker connection established");

                    let n = Notification::resumed(recovery, self.clock.now());
                    self.bus.publish(&n).await;
                }
                Err(e) => {
                    self.connected.store(false, Ordering::Release);
                    let attempt = state.record_failure();
                    tracing::error!(
                        attempt,
                        max_attempts = max,
                        error = %e,
                        label = e.as_label(),
                        "failed to establish broker connection"
                    );
                    self.publish_status(state, false);
                }
            },
        }
    }

    fn publish_status(&self, state: &ConnectionState, connected: bool) {
        self.status.send_replace(ConnectionStatus {
            connected,
            current_attempts: state.attempts,
            paused_until: state.paused_until,
        });
    }
}
