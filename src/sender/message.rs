//! Outbound message model.

use std::time::Duration;

/// Message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text.
    Text(String),
    /// Opaque bytes.
    Bytes(Vec<u8>),
    /// JSON document, already encoded.
    Json(String),
}

impl Payload {
    /// MIME-style content type for transports that carry one.
    pub fn content_type(&self) -> &'static str {
        match self {
            Payload::Text(_) => "text/plain",
            Payload::Bytes(_) => "application/octet-stream",
            Payload::Json(_) => "application/json",
        }
    }

    /// Body size in bytes.
    pub fn len(&self) -> usize {
        match self {
            Payload::Text(s) | Payload::Json(s) => s.len(),
            Payload::Bytes(b) => b.len(),
        }
    }

    /// True for an empty body.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A message addressed to a destination, handed to a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Destination queue name.
    pub destination: String,
    /// Message body.
    pub payload: Payload,
    /// Time-to-live; `None` means the message never expires.
    pub ttl: Option<Duration>,
    /// Whether the broker should persist the message. Guarded sends are non-persistent.
    pub persistent: bool,
}
