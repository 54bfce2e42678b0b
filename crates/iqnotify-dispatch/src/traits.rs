//! Dispatcher traits

use async_trait::async_trait;
use iqnotify_api::Payload;
use iqnotify_util::ChannelId;
use thiserror::Error;

/// Errors from delivering a notification
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Channel {channel} rejected notification: {message}")]
    Rejected { channel: ChannelId, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Delivers a payload to one notification channel
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Deliver one payload. Called once per pair that should be notified.
    async fn deliver(&self, channel: &ChannelId, payload: &Payload) -> DeliveryResult<()>;

    /// Optional: check if the dispatcher is healthy
    fn is_healthy(&self) -> bool {
        true
    }
}
