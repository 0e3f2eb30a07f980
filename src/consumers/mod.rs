//! # Consumer lifecycle.
//!
//! - [`Consumer`] / [`ConsumerRef`]: one startable broker listener;
//! - [`TaskConsumer`]: closure-backed consumer running on tokio;
//! - [`ConsumerPool`]: what the coordinator drives;
//! - [`ConsumerRegistry`]: the in-process pool;
//! - [`ConsumerCoordinator`]: the [`Subscribe`](crate::Subscribe) implementation that
//!   stops consumers on `Paused` and starts them on `Resumed`.

mod consumer;
mod coordinator;
mod pool;
mod registry;
mod task_consumer;

pub use consumer::{Consumer, ConsumerRef};
pub use coordinator::ConsumerCoordinator;
pub use pool::ConsumerPool;
pub use registry::ConsumerRegistry;
pub use task_consumer::TaskConsumer;
