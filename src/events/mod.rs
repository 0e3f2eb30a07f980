//! Connectivity notifications: types and synchronous bus.
//!
//! ## Contents
//! - [`Notification`], [`NotificationKind`], [`PauseReason`] notification payload
//! - [`Bus`] ordered, inline delivery to [`Subscribe`](crate::Subscribe) handlers
//!
//! ## Quick reference
//! - **Publisher**: `ConnectionSupervisor` (attempt cycle and health probe).
//! - **Subscribers**: `ConsumerCoordinator`, `LogWriter`, user handlers.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Notification, NotificationKind, PauseReason};
