use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

/// Channel type enumeration, in dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// SMTP mail
    Email,
    /// Generic JSON webhook
    Webhook,
    /// Telegram bot
    Telegram,
    /// DingTalk robot webhook (optionally signed)
    DingTalk,
}

impl ChannelType {
    pub fn as_str(&self) -> &str {
        match self {
            ChannelType::Email => "email",
            ChannelType::Webhook => "webhook",
            ChannelType::Telegram => "telegram",
            ChannelType::DingTalk => "dingtalk",
        }
    }
}

impl FromStr for ChannelType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(ChannelType::Email),
            "webhook" => Ok(ChannelType::Webhook),
            "telegram" => Ok(ChannelType::Telegram),
            "dingtalk" => Ok(ChannelType::DingTalk),
            _ => Err(DomainError::InvalidInput(format!(
                "Unknown channel type: {s}"
            ))),
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Channel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelConfig {
    /// SMTP configuration
    Email {
        smtp_host: String,
        smtp_port: u16,
        /// Login name; the sender address is used when absent
        username: Option<String>,
        password: String,
        from: String,
        to: Vec<String>,
    },
    /// Generic webhook configuration
    Webhook { url: String },
    /// Telegram bot configuration
    Telegram {
        bot_token: String,
        chat_id: String,
        proxy: Option<String>,
        api_base: Option<String>,
    },
    /// DingTalk robot configuration
    DingTalk {
        webhook: String,
        secret: Option<String>,
    },
}

impl ChannelConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            ChannelConfig::Email {
                smtp_host,
                smtp_port,
                password,
                from,
                to,
                ..
            } => {
                if smtp_host.trim().is_empty() {
                    return Err(DomainError::InvalidInput(
                        "SMTP host cannot be empty".to_string(),
                    ));
                }
                if *smtp_port == 0 {
                    return Err(DomainError::InvalidInput(
                        "SMTP port must be greater than 0".to_string(),
                    ));
                }
                if password.trim().is_empty() {
                    return Err(DomainError::InvalidInput(
                        "SMTP password cannot be empty".to_string(),
                    ));
                }
                if from.trim().is_empty() {
                    return Err(DomainError::InvalidInput(
                        "From address cannot be empty".to_string(),
                    ));
                }
                if to.iter().all(|addr| addr.trim().is_empty()) {
                    return Err(DomainError::InvalidInput(
                        "To addresses cannot be empty".to_string(),
                    ));
                }
            }
            ChannelConfig::Webhook { url } => {
                if url.trim().is_empty() {
                    return Err(DomainError::InvalidInput(
                        "Webhook url cannot be empty".to_string(),
                    ));
                }
            }
            ChannelConfig::Telegram {
                bot_token, chat_id, ..
            } => {
                if bot_token.trim().is_empty() {
                    return Err(DomainError::InvalidInput(
                        "Telegram bot_token cannot be empty".to_string(),
                    ));
                }
                if chat_id.trim().is_empty() {
                    return Err(DomainError::InvalidInput(
                        "Telegram chat_id cannot be empty".to_string(),
                    ));
                }
            }
            ChannelConfig::DingTalk { webhook, .. } => {
                if webhook.trim().is_empty() {
                    return Err(DomainError::InvalidInput(
                        "DingTalk webhook cannot be empty".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Get channel type from config
    pub fn channel_type(&self) -> ChannelType {
        match self {
            ChannelConfig::Email { .. } => ChannelType::Email,
            ChannelConfig::Webhook { .. } => ChannelType::Webhook,
            ChannelConfig::Telegram { .. } => ChannelType::Telegram,
            ChannelConfig::DingTalk { .. } => ChannelType::DingTalk,
        }
    }
}

/// How urgent an expiry warning is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyTier {
    Critical,
    Warning,
    Normal,
}

impl UrgencyTier {
    pub fn from_days(days_remaining: i64) -> Self {
        if days_remaining <= 7 {
            UrgencyTier::Critical
        } else if days_remaining <= 30 {
            UrgencyTier::Warning
        } else {
            UrgencyTier::Normal
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "🔴",
            UrgencyTier::Warning => "🟡",
            UrgencyTier::Normal => "🟢",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UrgencyTier::Critical => "CRITICAL",
            UrgencyTier::Warning => "WARNING",
            UrgencyTier::Normal => "NORMAL",
        }
    }
}
