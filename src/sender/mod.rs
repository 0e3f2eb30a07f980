//! # Guarded send surface.
//!
//! - [`MessageSender`]: checks connectivity before every send and fails fast;
//! - [`Transport`]: the broker-facing delivery capability;
//! - [`Payload`] / [`Delivery`]: what is sent and where.

mod guard;
mod message;
mod transport;

pub use guard::MessageSender;
pub use message::{Delivery, Payload};
pub use transport::Transport;
