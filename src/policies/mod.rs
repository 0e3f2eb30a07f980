//! Reconnect pacing policies.
//!
//! ## Contents
//! - [`BackoffPolicy`] how long the reconnect loop waits between attempts (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy to avoid synchronized reconnect storms
//!
//! ## Quick wiring
//! ```text
//! SupervisorConfig::reconnect_backoff() ──► BackoffPolicy
//!      └─► core::scheduler reconnect loop sleeps backoff.next(attempt_count)
//! ```
//!
//! The retry *budget* (max attempts, pause window) is not a policy here: it is
//! part of the supervisor state machine.

mod backoff;
mod jitter;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
