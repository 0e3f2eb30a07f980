use async_trait::async_trait;

use super::message::Delivery;
use crate::error::SendError;

/// Hands deliveries to the broker.
///
/// Implementations report broker-side failures as [`SendError::Transport`];
/// they never retry.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends one delivery.
    async fn deliver(&self, delivery: Delivery) -> Result<(), SendError>;
}
