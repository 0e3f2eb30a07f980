//! # Periodic drivers for the supervisor.
//!
//! Two loops run side by side until the cancellation token fires:
//!
//! ```text
//! reconnect loop:                         health loop (optional):
//!   loop {                                  first tick after one interval
//!     if !connected {                       loop {
//!       try_attempt_connect()  (skip if       tick (missed ticks delayed)
//!                               busy)         check_connection_status()
//!     }                                     }
//!     sleep(backoff.next(attempt_count))
//!   }
//! ```
//!
//! Cancellation aborts both sleeps immediately; an attempt already talking to
//! the factory finishes first.

use std::sync::Arc;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use super::{shutdown, supervisor::ConnectionSupervisor};

impl ConnectionSupervisor {
    /// Drives scheduled reconnects and health probes until `token` is cancelled.
    ///
    /// The first connection attempt happens immediately.
    pub async fn run(self: Arc<Self>, token: CancellationToken) {
        tracing::info!(
            max_attempts = self.config().max_reconnect_attempts,
            interval_s = self.config().reconnect_interval_seconds,
            pause_min = self.config().reconnect_pause_minutes,
            "connection supervisor started"
        );
        tokio::join!(
            reconnect_loop(Arc::clone(&self), token.clone()),
            health_loop(Arc::clone(&self), token),
        );
        tracing::info!("connection supervisor stopped");
    }

    /// Like [`run`](Self::run), but also stops on SIGINT/SIGTERM/SIGQUIT (Ctrl-C elsewhere).
    ///
    /// Returns `Err` only when the signal listeners could not be installed.
    pub async fn run_until_shutdown(self: Arc<Self>) -> std::io::Result<()> {
        let token = CancellationToken::new();
        let run = self.run(token.clone());
        tokio::pin!(run);

        select! {
            res = shutdown::wait_for_shutdown_signal() => {
                let res = match res {
                    Ok(sig) => {
                        tracing::info!(signal = sig.as_label(), "shutdown signal received");
                        Ok(())
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to install signal handlers");
                        Err(e)
                    }
                };
                token.cancel();
                run.await;
                res
            }
            _ = &mut run => Ok(()),
        }
    }
}

async fn reconnect_loop(sup: Arc<ConnectionSupervisor>, token: CancellationToken) {
    let backoff = sup.config().reconnect_backoff();

    loop {
        if token.is_cancelled() {
            break;
        }
        if !sup.is_connected() && !sup.try_attempt_connect().await {
            tracing::debug!("scheduled reconnect skipped: transition in progress");
        }

        let delay = backoff.next(sup.attempt_count());
        let sleep = time::sleep(delay);
        tokio::pin!(sleep);
        select! {
            _ = &mut sleep => {}
            _ = token.cancelled() => break,
        }
    }
}

async fn health_loop(sup: Arc<ConnectionSupervisor>, token: CancellationToken) {
    let Some(period) = sup.config().health_check_interval() else {
        tracing::debug!("health probe disabled");
        return;
    };

    let mut ticker = time::interval_at(time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

    loop {
        select! {
            _ = ticker.tick() => sup.check_connection_status().await,
            _ = token.cancelled() => break,
        }
    }
}
