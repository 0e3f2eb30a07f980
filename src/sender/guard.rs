//! # MessageSender: fail-fast guarded sends.
//!
//! Every send first reads the supervisor's connected flag. While the broker is
//! believed down the call returns [`SendError::NotConnected`] at once: no
//! transport call, no queueing, no waiting. Retrying is the supervisor's job.
//!
//! ```text
//! send(payload)
//!   ├─ !connected → Err(NotConnected)         (transport untouched)
//!   └─ connected  → transport.deliver(Delivery{queue, payload, ttl, non-persistent})
//! ```
//!
//! The flag is read without locking, so a send racing a transition may see
//! either side of it.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use mqvisor::{
//!     Connection, ConnectionFactory, ConnectionSupervisor, ConnectError, Delivery,
//!     MessageSender, SendError, SupervisorConfig, Transport,
//! };
//!
//! struct Down;
//!
//! #[async_trait]
//! impl ConnectionFactory for Down {
//!     async fn open(&self) -> Result<Box<dyn Connection>, ConnectError> {
//!         Err(ConnectError::unavailable("connection refused"))
//!     }
//! }
//!
//! struct Discard;
//!
//! #[async_trait]
//! impl Transport for Discard {
//!     async fn deliver(&self, _d: Delivery) -> Result<(), SendError> { Ok(()) }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sup = ConnectionSupervisor::builder(SupervisorConfig::default(), Arc::new(Down)).build()?;
//!     let sender = MessageSender::from_supervisor(&sup, Arc::new(Discard));
//!
//!     let err = sender.send_text("hello").await.unwrap_err();
//!     assert!(err.is_unavailable());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::{
    message::{Delivery, Payload},
    transport::Transport,
};
use crate::{
    core::{ConnectionSupervisor, Connectivity},
    error::SendError,
};

/// Guarded sender bound to one destination queue.
#[derive(Clone)]
pub struct MessageSender {
    connectivity: Connectivity,
    transport: Arc<dyn Transport>,
    destination: String,
    ttl: Option<Duration>,
}

impl MessageSender {
    /// Creates a sender for `destination`.
    pub fn new(
        connectivity: Connectivity,
        transport: Arc<dyn Transport>,
        destination: impl Into<String>,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            connectivity,
            transport,
            destination: destination.into(),
            ttl,
        }
    }

    /// Creates a sender using the supervisor's connected flag, queue name and message TTL.
    pub fn from_supervisor(sup: &ConnectionSupervisor, transport: Arc<dyn Transport>) -> Self {
        let cfg = sup.config();
        Self::new(sup.connectivity(), transport, cfg.queue_name.clone(), cfg.message_ttl())
    }

    /// Destination queue name.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Sends a payload, or fails fast when the broker is down.
    pub async fn send(&self, payload: Payload) -> Result<(), SendError> {
        self.ensure_connected()?;

        let bytes = payload.len();
        let content_type = payload.content_type();
        let delivery = Delivery {
            destination: self.destination.clone(),
            payload,
            ttl: self.ttl,
            persistent: false,
        };

        match self.transport.deliver(delivery).await {
            Ok(()) => {
                tracing::debug!(destination = %self.destination, bytes, content_type, "message sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    destination = %self.destination,
                    error = %e,
                    label = e.as_label(),
                    "message send failed"
                );
                Err(e)
            }
        }
    }

    /// Sends a text message.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<(), SendError> {
        self.send(Payload::Text(text.into())).await
    }

    /// Sends a bytes message.
    pub async fn send_bytes(&self, bytes: impl Into<Vec<u8>>) -> Result<(), SendError> {
        self.send(Payload::Bytes(bytes.into())).await
    }

    /// Encodes `value` as JSON and sends it.
    ///
    /// The connection check comes first, so an outage is reported as
    /// `NotConnected` even for values that would not encode.
    pub async fn send_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), SendError> {
        self.ensure_connected()?;
        let body = serde_json::to_string(value).map_err(|e| SendError::Encode {
            reason: e.to_string(),
        })?;
        self.send(Payload::Json(body)).await
    }

    fn ensure_connected(&self) -> Result<(), SendError> {
        if self.connectivity.is_connected() {
            return Ok(());
        }
        tracing::warn!(
            destination = %self.destination,
            "send rejected: message queue not connected"
        );
        Err(SendError::NotConnected)
    }
}
