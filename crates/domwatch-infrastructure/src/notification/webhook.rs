use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use domwatch_domain::notification::{ChannelType, NotificationSender, SendError};
use domwatch_domain::DomainRecord;

use super::{ensure_success, http_client, message_builder};

/// Generic JSON webhook sender
pub struct WebhookSender {
    url: String,
    client: Client,
}

impl WebhookSender {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SendError> {
        Ok(Self {
            url: url.into(),
            client: http_client(timeout)?,
        })
    }
}

#[async_trait]
impl NotificationSender for WebhookSender {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Webhook
    }

    async fn send(&self, record: &DomainRecord, days_remaining: i64) -> Result<(), SendError> {
        let payload = message_builder::webhook_payload(record, days_remaining);

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendError::Transport(format!("Failed to send webhook: {}", e)))?;

        ensure_success(response).await?;

        info!(domain = %record.name(), "Webhook notification sent");
        Ok(())
    }
}
