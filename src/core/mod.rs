//! Runtime core: connection state, transitions and scheduling.
//!
//! The public entry point is [`ConnectionSupervisor`], built through
//! [`SupervisorBuilder`].
//!
//! Internal modules:
//! - [`state`]: composite connection state and its transition rules;
//! - [`supervisor`]: serializes transitions, calls the factory, publishes notifications;
//! - [`scheduler`]: reconnect and health loops, cancellation;
//! - [`factory`]: broker connection capability and the probe helper;
//! - [`clock`]: wall-clock source;
//! - [`status`]: read-side snapshots;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod builder;
mod clock;
mod factory;
mod scheduler;
mod shutdown;
mod state;
mod status;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use clock::{Clock, ManualClock, SystemClock};
pub use factory::{Connection, ConnectionFactory};
pub use status::{ConnectionStatus, Connectivity, ProbeReport};
pub use supervisor::ConnectionSupervisor;
