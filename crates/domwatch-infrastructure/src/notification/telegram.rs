use async_trait::async_trait;
use reqwest::{Client, Proxy};
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

use domwatch_domain::notification::{ChannelType, NotificationSender, SendError};
use domwatch_domain::DomainRecord;

use super::{ensure_success, http_client, message_builder};

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Telegram bot API sender
pub struct TelegramSender {
    bot_token: String,
    chat_id: String,
    api_base: String,
    client: Client,
}

impl TelegramSender {
    /// `proxy` is best effort: when it cannot be applied the sender
    /// falls back to a direct connection.
    pub fn new(
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        proxy: Option<&str>,
        api_base: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, SendError> {
        let client = match proxy {
            Some(proxy_url) => match proxied_client(proxy_url, timeout) {
                Ok(client) => client,
                Err(e) => {
                    warn!(
                        proxy = %proxy_url,
                        "Telegram proxy unusable, using direct connection: {}",
                        e
                    );
                    http_client(timeout)?
                }
            },
            None => http_client(timeout)?,
        };

        Ok(Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: api_base
                .unwrap_or(DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }
}

fn proxied_client(proxy_url: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .proxy(Proxy::all(proxy_url)?)
        .build()
}

#[async_trait]
impl NotificationSender for TelegramSender {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Telegram
    }

    async fn send(&self, record: &DomainRecord, days_remaining: i64) -> Result<(), SendError> {
        let payload = json!({
            "chat_id": self.chat_id,
            "text": message_builder::telegram_text(record, days_remaining),
        });

        let response = self
            .client
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            // The token is part of the URL; keep it out of the error text
            .map_err(|e| SendError::Transport(format!("Failed to reach Telegram: {}", e.without_url())))?;

        ensure_success(response).await?;

        info!(domain = %record.name(), chat_id = %self.chat_id, "Telegram notification sent");
        Ok(())
    }
}
