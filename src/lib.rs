//! # mqvisor
//!
//! **mqvisor** supervises a client's connection to a message-queue broker.
//!
//! It counts failed connection attempts, pauses reconnection for a while once
//! a budget is spent, probes a live connection for silent loss, and tells the
//! rest of the application when to stop and when to restart its consumers.
//! Sends are guarded so they fail fast while the broker is unreachable.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   scheduler (reconnect loop, health loop)      operator / endpoint
//!         │ try_attempt_connect()                  │ trigger_manual_reconnect()
//!         │ check_connection_status()              │ status(), test_connection()
//!         ▼                                        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  ConnectionSupervisor                                             │
//! │  - transition lock (one transition at a time)                     │
//! │  - connected: AtomicBool (lock-free reads)                        │
//! │  - attempts / paused_until / recovery pending                     │
//! │  - ConnectionFactory (open + start + close)                       │
//! └──────┬─────────────────────────────────────────────┬──────────────┘
//!        │ publish(&Notification), inline and ordered  │ Connectivity
//!        ▼                                             ▼
//! ┌──────────────────────────────┐            ┌──────────────────────┐
//! │             Bus              │            │    MessageSender     │
//! └───┬──────────────────┬───────┘            │  !connected → Err    │
//!     ▼                  ▼                    │   connected → send   │
//! ConsumerCoordinator   LogWriter / custom    └──────────┬───────────┘
//!     │ stop_all / start_all + one retry                 ▼
//!     ▼                                              Transport
//! ConsumerPool (ConsumerRegistry of Consumers)
//! ```
//!
//! ### Attempt cycle
//! ```text
//! connected?            → nothing
//! paused, not expired?  → nothing
//! paused, expired?      → attempts = 0, continue
//! attempts >= max?      → pause for N minutes, publish Paused{BackoffExhausted, until}
//! factory ok            → attempts = 0, publish Resumed{recovery}
//! factory err           → attempts += 1 (silent)
//!
//! health probe fails    → connected = false, publish Paused{ProbeFailure}
//! ```
//!
//! ## Features
//! | Area             | Description                                                     | Key types / traits                                |
//! |------------------|-----------------------------------------------------------------|---------------------------------------------------|
//! | **Supervision**  | Attempt budget, pause window, manual trigger, health probe.     | [`ConnectionSupervisor`], [`SupervisorBuilder`]   |
//! | **Broker seam**  | Pluggable connection opening; no protocol inside the crate.     | [`ConnectionFactory`], [`Connection`]             |
//! | **Notifications**| Paused / Resumed, delivered inline to subscribers.              | [`Notification`], [`Subscribe`]                   |
//! | **Consumers**    | Idempotent start/stop with one corrective retry per straggler.  | [`ConsumerCoordinator`], [`ConsumerRegistry`]     |
//! | **Sending**      | Fail-fast guard in front of a transport.                        | [`MessageSender`], [`Transport`]                  |
//! | **Policies**     | Reconnect pacing.                                               | [`BackoffPolicy`], [`JitterPolicy`]               |
//! | **Status**       | Serializable snapshots and a one-shot connection test.          | [`ConnectionStatus`], [`ProbeReport`]             |
//! | **Configuration**| Deserializable settings with validation.                        | [`SupervisorConfig`]                              |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use mqvisor::{
//!     Connection, ConnectionFactory, ConnectionSupervisor, ConnectError, ConsumerCoordinator,
//!     ConsumerRegistry, SupervisorConfig, TaskConsumer,
//! };
//!
//! struct Broker;
//!
//! struct Session;
//!
//! #[async_trait]
//! impl Connection for Session {
//!     async fn start(&mut self) -> Result<(), ConnectError> { Ok(()) }
//!     async fn close(&mut self) -> Result<(), ConnectError> { Ok(()) }
//! }
//!
//! #[async_trait]
//! impl ConnectionFactory for Broker {
//!     async fn open(&self) -> Result<Box<dyn Connection>, ConnectError> {
//!         Ok(Box::new(Session))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ConsumerRegistry::new();
//!     registry
//!         .register(TaskConsumer::arc("orders", |token: CancellationToken| async move {
//!             token.cancelled().await;
//!         }))
//!         .await?;
//!
//!     let sup = ConnectionSupervisor::builder(SupervisorConfig::default(), Arc::new(Broker))
//!         .with_subscriber(ConsumerCoordinator::new(registry.clone()))
//!         .build()?;
//!
//!     sup.run_until_shutdown().await?;
//!     Ok(())
//! }
//! ```
mod config;
mod consumers;
mod core;
mod error;
mod events;
mod policies;
mod sender;
mod subscribers;

#[cfg(test)]
mod testing;

// ---- Public re-exports ----

pub use config::SupervisorConfig;
pub use consumers::{
    Consumer, ConsumerCoordinator, ConsumerPool, ConsumerRef, ConsumerRegistry, TaskConsumer,
};
pub use crate::core::{
    Clock, Connection, ConnectionFactory, ConnectionStatus, ConnectionSupervisor, Connectivity,
    ManualClock, ProbeReport, SupervisorBuilder, SystemClock,
};
pub use error::{ConfigError, ConnectError, ConsumerError, SendError};
pub use events::{Bus, Notification, NotificationKind, PauseReason};
pub use policies::{BackoffPolicy, JitterPolicy};
pub use sender::{Delivery, MessageSender, Payload, Transport};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
