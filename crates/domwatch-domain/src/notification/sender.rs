use async_trait::async_trait;

use super::value_objects::ChannelType;
use crate::domain_record::DomainRecord;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("endpoint returned status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("smtp error: {0}")]
    Smtp(String),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("invalid channel configuration: {0}")]
    Configuration(String),

    #[error("no notification channels configured")]
    NoChannelsConfigured,
}

/// Notification sender trait (Strategy pattern)
/// Each notification channel type implements this trait
#[async_trait]
pub trait NotificationSender: Send + Sync {
    fn channel_type(&self) -> ChannelType;

    /// Attempt exactly one delivery of an expiry warning
    async fn send(&self, record: &DomainRecord, days_remaining: i64) -> Result<(), SendError>;
}
