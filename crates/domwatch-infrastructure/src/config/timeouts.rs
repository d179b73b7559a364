use std::time::Duration;

/// Timeouts for every outbound call the pipeline makes
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// WHOIS lookup API request timeout
    pub lookup_request: Duration,

    /// Webhook / bot HTTP request timeout
    pub notification_request: Duration,

    /// SMTP session timeout
    pub smtp: Duration,

    /// Database connection acquire timeout
    pub db_acquire: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            lookup_request: Duration::from_secs(30),
            notification_request: Duration::from_secs(30),
            smtp: Duration::from_secs(30),
            db_acquire: Duration::from_secs(10),
        }
    }
}

impl TimeoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lookup_request(mut self, timeout: Duration) -> Self {
        self.lookup_request = timeout;
        self
    }

    pub fn with_notification_request(mut self, timeout: Duration) -> Self {
        self.notification_request = timeout;
        self
    }

    pub fn with_smtp(mut self, timeout: Duration) -> Self {
        self.smtp = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_set_only_their_field() {
        let timeouts = TimeoutConfig::new()
            .with_notification_request(Duration::from_secs(5))
            .with_smtp(Duration::from_secs(60));

        assert_eq!(timeouts.notification_request, Duration::from_secs(5));
        assert_eq!(timeouts.smtp, Duration::from_secs(60));
        assert_eq!(timeouts.lookup_request, Duration::from_secs(30));
    }
}
