//! Error types used by the connection supervisor, the consumer pool and the sender.
//!
//! This module defines four enums:
//!
//! - [`ConnectError`]: failures of a single broker connection attempt.
//! - [`ConsumerError`]: failures to start or stop message consumers.
//! - [`SendError`]: failures of the outbound send surface.
//! - [`ConfigError`]: rejected configuration values.
//!
//! All of them provide `as_label` (stable snake_case for logs/metrics) and
//! `as_message` helpers. Only [`SendError::NotConnected`] is meant to reach an
//! outside caller as a typed error; everything else is recovered and logged
//! inside the crate.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by a connection attempt.
///
/// Returned by [`ConnectionFactory::open`](crate::ConnectionFactory::open) and
/// [`Connection::start`](crate::Connection::start). The supervisor records them
/// as attempt-count increments and never surfaces them to callers.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// Broker (or its host) refused or could not be reached.
    #[error("broker unavailable: {reason}")]
    Unavailable {
        /// Transport-provided detail.
        reason: String,
    },

    /// The factory gave up waiting for the broker.
    #[error("connect timed out after {timeout:?}")]
    Timeout {
        /// The factory's own timeout.
        timeout: Duration,
    },

    /// Credentials or channel authorization were rejected.
    #[error("not authorized: {reason}")]
    NotAuthorized {
        /// Transport-provided detail.
        reason: String,
    },

    /// Any other protocol-level failure.
    #[error("protocol error: {reason}")]
    Protocol {
        /// Transport-provided detail.
        reason: String,
    },
}

impl ConnectError {
    /// Shorthand for [`ConnectError::Unavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ConnectError::Unavailable {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mqvisor::ConnectError;
    ///
    /// let err = ConnectError::unavailable("connection refused");
    /// assert_eq!(err.as_label(), "connect_unavailable");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConnectError::Unavailable { .. } => "connect_unavailable",
            ConnectError::Timeout { .. } => "connect_timeout",
            ConnectError::NotAuthorized { .. } => "connect_not_authorized",
            ConnectError::Protocol { .. } => "connect_protocol",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConnectError::Unavailable { reason } => format!("unavailable: {reason}"),
            ConnectError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            ConnectError::NotAuthorized { reason } => format!("not authorized: {reason}"),
            ConnectError::Protocol { reason } => format!("protocol: {reason}"),
        }
    }
}

/// # Errors produced by consumer lifecycle operations.
///
/// The [`ConsumerCoordinator`](crate::ConsumerCoordinator) logs and swallows
/// these; they are returned by [`ConsumerPool`](crate::ConsumerPool) so that
/// other callers can still inspect them.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsumerError {
    /// No consumer is registered under this id.
    #[error("consumer '{id}' not found")]
    NotFound {
        /// Requested consumer id.
        id: String,
    },

    /// A consumer with this id is already registered.
    #[error("consumer '{id}' already registered")]
    AlreadyRegistered {
        /// Duplicate consumer id.
        id: String,
    },

    /// The consumer failed to start.
    #[error("consumer '{id}' failed to start: {reason}")]
    Start {
        /// Consumer id.
        id: String,
        /// Failure detail.
        reason: String,
    },

    /// The consumer failed to stop.
    #[error("consumer '{id}' failed to stop: {reason}")]
    Stop {
        /// Consumer id.
        id: String,
        /// Failure detail.
        reason: String,
    },

    /// A bulk operation left some consumers behind.
    #[error("bulk operation failed for {failed:?}")]
    Bulk {
        /// Ids of consumers whose individual operation failed.
        failed: Vec<String>,
    },
}

impl ConsumerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConsumerError::NotFound { .. } => "consumer_not_found",
            ConsumerError::AlreadyRegistered { .. } => "consumer_already_registered",
            ConsumerError::Start { .. } => "consumer_start_failed",
            ConsumerError::Stop { .. } => "consumer_stop_failed",
            ConsumerError::Bulk { .. } => "consumer_bulk_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConsumerError::NotFound { id } => format!("not found: {id}"),
            ConsumerError::AlreadyRegistered { id } => format!("duplicate: {id}"),
            ConsumerError::Start { id, reason } => format!("start {id}: {reason}"),
            ConsumerError::Stop { id, reason } => format!("stop {id}: {reason}"),
            ConsumerError::Bulk { failed } => format!("bulk failed: {failed:?}"),
        }
    }
}

/// # Errors produced by the send surface.
///
/// [`SendError::NotConnected`] is the fail-fast guard result: the supervisor
/// reports the broker as unreachable and the transport was never called.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The broker connection is currently down; nothing was sent.
    #[error("message queue is not connected")]
    NotConnected,

    /// The payload could not be encoded.
    #[error("payload encoding failed: {reason}")]
    Encode {
        /// Encoder detail.
        reason: String,
    },

    /// The transport failed while sending.
    #[error("transport failed: {reason}")]
    Transport {
        /// Transport detail.
        reason: String,
    },
}

impl SendError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use mqvisor::SendError;
    ///
    /// assert_eq!(SendError::NotConnected.as_label(), "send_not_connected");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SendError::NotConnected => "send_not_connected",
            SendError::Encode { .. } => "send_encode_failed",
            SendError::Transport { .. } => "send_transport_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    ///
    /// Meant for internal logs only; see [`SendError::public_message`] for callers.
    pub fn as_message(&self) -> String {
        match self {
            SendError::NotConnected => "not connected".to_string(),
            SendError::Encode { reason } => format!("encode: {reason}"),
            SendError::Transport { reason } => format!("transport: {reason}"),
        }
    }

    /// True when the caller should be told the service is temporarily unavailable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SendError::NotConnected)
    }

    /// Message safe to hand to an outside caller; never carries internal detail.
    ///
    /// # Example
    /// ```
    /// use mqvisor::SendError;
    ///
    /// let err = SendError::Transport { reason: "socket closed by 10.0.0.7".into() };
    /// assert!(!err.public_message().contains("10.0.0.7"));
    /// ```
    pub fn public_message(&self) -> &'static str {
        match self {
            SendError::NotConnected => {
                "message queue service is currently unavailable, please retry later"
            }
            _ => "an unexpected error occurred while processing the request",
        }
    }
}

/// # Errors produced by configuration validation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A field holds a value the supervisor cannot work with.
    #[error("invalid config field '{field}': {reason}")]
    Invalid {
        /// Offending field name (kebab-case, as configured).
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Invalid { .. } => "config_invalid",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::Invalid { field, reason } => format!("{field}: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_message_hides_transport_detail() {
        let err = SendError::Transport {
            reason: "broker mq01:1414 reset".into(),
        };
        assert!(!err.is_unavailable());
        assert!(!err.public_message().contains("mq01"));
        assert!(err.as_message().contains("mq01"));
    }

    #[test]
    fn test_not_connected_is_unavailable() {
        let err = SendError::NotConnected;
        assert!(err.is_unavailable());
        assert!(err.public_message().contains("unavailable"));
    }

    #[test]
    fn test_connect_error_labels_are_distinct() {
        let labels = [
            ConnectError::unavailable("x").as_label(),
            ConnectError::Timeout {
                timeout: Duration::from_secs(1),
            }
            .as_label(),
            ConnectError::NotAuthorized { reason: "x".into() }.as_label(),
            ConnectError::Protocol { reason: "x".into() }.as_label(),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_bulk_message_lists_ids() {
        let err = ConsumerError::Bulk {
            failed: vec!["orders".into(), "audit".into()],
        };
        assert_eq!(err.as_label(), "consumer_bulk_failed");
        assert!(err.to_string().contains("orders"));
    }
}
