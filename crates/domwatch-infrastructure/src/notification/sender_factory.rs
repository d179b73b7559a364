use std::sync::Arc;
use tracing::warn;

use domwatch_domain::notification::{ChannelConfig, NotificationSender};
use domwatch_domain::shared::DomainError;

use super::{DingTalkSender, EmailSender, SmtpSettings, TelegramSender, WebhookSender};
use crate::config::TimeoutConfig;

/// Create a notification sender based on channel configuration
pub fn create_sender(
    config: &ChannelConfig,
    timeouts: &TimeoutConfig,
) -> Result<Arc<dyn NotificationSender>, DomainError> {
    config.validate()?;

    let sender: Arc<dyn NotificationSender> = match config {
        ChannelConfig::Email {
            smtp_host,
            smtp_port,
            username,
            password,
            from,
            to,
        } => {
            let smtp = SmtpSettings {
                host: smtp_host.clone(),
                port: *smtp_port,
                // Most providers log in with the sender address
                username: username.clone().unwrap_or_else(|| from.clone()),
                password: password.clone(),
                timeout: timeouts.smtp,
            };
            Arc::new(EmailSender::new(smtp, from, to)?)
        }
        ChannelConfig::Webhook { url } => {
            Arc::new(WebhookSender::new(url.clone(), timeouts.notification_request)?)
        }
        ChannelConfig::Telegram {
            bot_token,
            chat_id,
            proxy,
            api_base,
        } => Arc::new(TelegramSender::new(
            bot_token.clone(),
            chat_id.clone(),
            proxy.as_deref(),
            api_base.as_deref(),
            timeouts.notification_request,
        )?),
        ChannelConfig::DingTalk { webhook, secret } => Arc::new(DingTalkSender::new(
            webhook,
            secret.clone(),
            timeouts.notification_request,
        )?),
    };

    Ok(sender)
}

/// Build senders for every configured channel, preserving order.
/// A channel whose configuration is unusable is logged and left out.
pub fn build_senders(
    configs: &[ChannelConfig],
    timeouts: &TimeoutConfig,
) -> Vec<Arc<dyn NotificationSender>> {
    configs
        .iter()
        .filter_map(|config| match create_sender(config, timeouts) {
            Ok(sender) => Some(sender),
            Err(e) => {
                warn!(
                    channel = %config.channel_type(),
                    "Skipping notification channel: {}",
                    e
                );
                None
            }
        })
        .collect()
}
