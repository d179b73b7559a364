//! File configuration (YAML) plus the persisted-settings override layer.

mod overrides;
mod timeouts;

pub use overrides::apply_settings;
pub use timeouts::TimeoutConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use domwatch_domain::monitor::AlertThresholds;
use domwatch_domain::notification::ChannelConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub whois: WhoisConfig,
    pub monitor: MonitorConfig,
    pub notifications: NotificationsConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(raw)?;
        Ok(config)
    }

    /// SMTP sessions share the notification request timeout
    pub fn timeouts(&self) -> TimeoutConfig {
        let notification = Duration::from_secs(self.notifications.request_timeout_secs.max(1));
        TimeoutConfig::new()
            .with_lookup_request(Duration::from_secs(self.whois.timeout_secs.max(1)))
            .with_notification_request(notification)
            .with_smtp(notification)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/domwatch.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhoisConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Cron expression, 5 fields (minute precision) or 6 fields (with seconds)
    pub check_interval: String,
    pub alert_days: AlertThresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            check_interval: "0 9 * * *".to_string(),
            alert_days: AlertThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    pub email: EmailChannelConfig,
    pub webhook: WebhookChannelConfig,
    pub telegram: TelegramChannelConfig,
    #[serde(alias = "dingding")]
    pub dingtalk: DingTalkChannelConfig,
    pub request_timeout_secs: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            email: EmailChannelConfig::default(),
            webhook: WebhookChannelConfig::default(),
            telegram: TelegramChannelConfig::default(),
            dingtalk: DingTalkChannelConfig::default(),
            request_timeout_secs: 30,
        }
    }
}

impl NotificationsConfig {
    /// Enabled channels in dispatch order: email, webhook, telegram, dingtalk
    pub fn enabled_channels(&self) -> Vec<ChannelConfig> {
        let mut channels = Vec::new();

        if self.email.enabled {
            channels.push(ChannelConfig::Email {
                smtp_host: self.email.smtp_host.clone(),
                smtp_port: self.email.smtp_port,
                username: self.email.username.clone().filter(|u| !u.is_empty()),
                password: self.email.password.clone(),
                from: self.email.from.clone(),
                to: self.email.to.clone(),
            });
        }
        if self.webhook.enabled {
            channels.push(ChannelConfig::Webhook {
                url: self.webhook.url.clone(),
            });
        }
        if self.telegram.enabled {
            channels.push(ChannelConfig::Telegram {
                bot_token: self.telegram.bot_token.clone(),
                chat_id: self.telegram.chat_id.clone(),
                proxy: self.telegram.proxy.clone().filter(|p| !p.is_empty()),
                api_base: self.telegram.api_base.clone().filter(|b| !b.is_empty()),
            });
        }
        if self.dingtalk.enabled {
            channels.push(ChannelConfig::DingTalk {
                webhook: self.dingtalk.webhook.clone(),
                secret: self.dingtalk.secret.clone().filter(|s| !s.is_empty()),
            });
        }

        channels
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailChannelConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    pub from: String,
    pub password: String,
    pub to: Vec<String>,
}

impl Default for EmailChannelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: String::new(),
            smtp_port: 465,
            username: None,
            from: String::new(),
            password: String::new(),
            to: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookChannelConfig {
    pub enabled: bool,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramChannelConfig {
    pub enabled: bool,
    pub bot_token: String,
    pub chat_id: String,
    /// Optional proxy, e.g. `socks5://127.0.0.1:7890`
    pub proxy: Option<String>,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DingTalkChannelConfig {
    pub enabled: bool,
    pub webhook: String,
    pub secret: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: String,
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: "logs".to_string(),
            level: "info".to_string(),
        }
    }
}
