//! Error types for iqnotify

use thiserror::Error;

/// Error for a malformed notification request
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl NotifyError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
