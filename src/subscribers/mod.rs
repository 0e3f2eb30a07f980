//! # Notification subscribers.
//!
//! This module provides the [`Subscribe`] trait and the built-in
//! [`LogWriter`] (feature `logging`).
//!
//! ## Architecture
//! ```text
//! ConnectionSupervisor ── publish(&Notification) ──► Bus
//!                                                     │ (inline, in order)
//!                                  ┌──────────────────┼──────────────┐
//!                                  ▼                  ▼              ▼
//!                        ConsumerCoordinator      LogWriter       Custom
//!                        (start/stop consumers)   (tracing)       (alerts, ...)
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
