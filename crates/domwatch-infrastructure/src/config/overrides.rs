use std::collections::HashMap;
use tracing::warn;

use domwatch_domain::monitor::AlertThresholds;

use super::AppConfig;

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Apply persisted key/value settings on top of the file configuration.
///
/// Returns the number of keys that were applied. Unknown keys and values
/// that fail to parse are ignored.
pub fn apply_settings(config: &mut AppConfig, settings: &HashMap<String, String>) -> usize {
    let mut applied = 0;

    for (key, value) in settings {
        let used = match key.as_str() {
            "monitor.check_interval" if !value.trim().is_empty() => {
                config.monitor.check_interval = value.trim().to_string();
                true
            }
            "monitor.alert_days" if !value.trim().is_empty() => {
                match AlertThresholds::parse_list(value) {
                    Ok(thresholds) => {
                        config.monitor.alert_days = thresholds;
                        true
                    }
                    Err(e) => {
                        warn!(setting = %key, "Ignoring alert_days override: {}", e);
                        false
                    }
                }
            }

            "email.enabled" => {
                config.notifications.email.enabled = value == "true";
                true
            }
            "email.smtp_host" => {
                config.notifications.email.smtp_host = value.clone();
                true
            }
            "email.smtp_port" => match value.trim().parse::<u16>() {
                Ok(port) => {
                    config.notifications.email.smtp_port = port;
                    true
                }
                Err(_) => false,
            },
            "email.from" => {
                config.notifications.email.from = value.clone();
                true
            }
            "email.password" => {
                config.notifications.email.password = value.clone();
                true
            }
            "email.to" if !value.trim().is_empty() => {
                config.notifications.email.to = split_list(value);
                true
            }

            "webhook.enabled" => {
                config.notifications.webhook.enabled = value == "true";
                true
            }
            "webhook.url" => {
                config.notifications.webhook.url = value.clone();
                true
            }

            "telegram.enabled" => {
                config.notifications.telegram.enabled = value == "true";
                true
            }
            "telegram.bot_token" => {
                config.notifications.telegram.bot_token = value.clone();
                true
            }
            "telegram.chat_id" => {
                config.notifications.telegram.chat_id = value.clone();
                true
            }

            "dingding.enabled" => {
                config.notifications.dingtalk.enabled = value == "true";
                true
            }
            "dingding.webhook" => {
                config.notifications.dingtalk.webhook = value.clone();
                true
            }
            "dingding.secret" => {
                config.notifications.dingtalk.secret = Some(value.clone());
                true
            }

            _ => false,
        };

        if used {
            applied += 1;
        }
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_monitor_overrides() {
        let mut config = AppConfig::default();
        let applied = apply_settings(
            &mut config,
            &settings(&[
                ("monitor.check_interval", "*/30 * * * *"),
                ("monitor.alert_days", "45, 15,bogus,3"),
            ]),
        );

        assert_eq!(applied, 2);
        assert_eq!(config.monitor.check_interval, "*/30 * * * *");
        assert_eq!(config.monitor.alert_days.as_slice(), &[45, 15, 3]);
    }

    #[test]
    fn test_invalid_alert_days_keep_file_value() {
        let mut config = AppConfig::default();
        let applied = apply_settings(&mut config, &settings(&[("monitor.alert_days", "x,-3")]));

        assert_eq!(applied, 0);
        assert_eq!(config.monitor.alert_days.as_slice(), &[30, 14, 7, 1]);
    }

    #[test]
    fn test_channel_overrides() {
        let mut config = AppConfig::default();
        apply_settings(
            &mut config,
            &settings(&[
                ("email.enabled", "true"),
                ("email.smtp_port", "587"),
                ("email.to", "a@example.com, b@example.com,"),
                ("telegram.enabled", "false"),
                ("dingding.enabled", "true"),
                ("dingding.secret", "s3cret"),
                ("unknown.key", "ignored"),
            ]),
        );

        let email = &config.notifications.email;
        assert!(email.enabled);
        assert_eq!(email.smtp_port, 587);
        assert_eq!(email.to, vec!["a@example.com", "b@example.com"]);
        assert!(!config.notifications.telegram.enabled);
        assert!(config.notifications.dingtalk.enabled);
        assert_eq!(config.notifications.dingtalk.secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_bad_port_is_ignored() {
        let mut config = AppConfig::default();
        let applied = apply_settings(&mut config, &settings(&[("email.smtp_port", "smtp")]));
        assert_eq!(applied, 0);
        assert_eq!(config.notifications.email.smtp_port, 465);
    }
}
