use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::Value;
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use domwatch_domain::notification::{ChannelType, NotificationSender, SendError};
use domwatch_domain::DomainRecord;

use super::{ensure_success, http_client, message_builder};

type HmacSha256 = Hmac<Sha256>;

/// DingTalk robot webhook sender with optional request signing
pub struct DingTalkSender {
    webhook: Url,
    secret: Option<String>,
    client: Client,
}

impl DingTalkSender {
    pub fn new(
        webhook: &str,
        secret: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SendError> {
        let webhook = Url::parse(webhook.trim())
            .map_err(|e| SendError::Configuration(format!("Invalid DingTalk webhook: {}", e)))?;

        Ok(Self {
            webhook,
            secret: secret.filter(|s| !s.is_empty()),
            client: http_client(timeout)?,
        })
    }

    /// Webhook URL for one request; signed when a secret is configured
    fn request_url(&self, timestamp_ms: i64) -> Result<Url, SendError> {
        match &self.secret {
            Some(secret) => signed_url(&self.webhook, &timestamp_ms.to_string(), secret),
            None => Ok(self.webhook.clone()),
        }
    }
}

/// `base64(HMAC-SHA256(key = secret, msg = "<timestamp>\n<secret>"))`
pub(crate) fn sign(timestamp: &str, secret: &str) -> Result<String, SendError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SendError::Configuration(format!("Invalid DingTalk secret: {}", e)))?;
    mac.update(format!("{}\n{}", timestamp, secret).as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

fn signed_url(webhook: &Url, timestamp: &str, secret: &str) -> Result<Url, SendError> {
    let signature = sign(timestamp, secret)?;
    let mut url = webhook.clone();
    url.query_pairs_mut()
        .append_pair("timestamp", timestamp)
        .append_pair("sign", &signature);
    Ok(url)
}

/// DingTalk answers 200 with `{"errcode": n, "errmsg": ".."}`; non-zero means rejected
pub(crate) fn check_response_body(body: &str) -> Result<(), SendError> {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        debug!("DingTalk response is not JSON, accepting: {}", body);
        return Ok(());
    };

    match parsed.get("errcode").and_then(Value::as_i64) {
        Some(code) if code != 0 => Err(SendError::Provider {
            code,
            message: parsed
                .get("errmsg")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string(),
        }),
        _ => Ok(()),
    }
}

#[async_trait]
impl NotificationSender for DingTalkSender {
    fn channel_type(&self) -> ChannelType {
        ChannelType::DingTalk
    }

    async fn send(&self, record: &DomainRecord, days_remaining: i64) -> Result<(), SendError> {
        let url = self.request_url(Utc::now().timestamp_millis())?;
        let payload = message_builder::dingtalk_markdown(record, days_remaining);

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendError::Transport(format!("Failed to send DingTalk message: {}", e.without_url())))?;

        let response = ensure_success(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| SendError::Transport(format!("Failed to read DingTalk response: {}", e)))?;

        check_response_body(&body)?;

        info!(domain = %record.name(), signed = self.secret.is_some(), "DingTalk notification sent");
        Ok(())
    }
}
