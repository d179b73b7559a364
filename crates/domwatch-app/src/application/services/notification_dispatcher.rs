use log::{error, info, warn};
use std::sync::Arc;

use domwatch_domain::notification::{
    NotificationLogRepository, NotificationOutcome, NotificationRecord, NotificationSender,
    SendError,
};
use domwatch_domain::DomainRecord;

/// Result of a dispatch in which at least one channel delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub delivered: usize,
    pub failed: usize,
}

/// Fans one expiry warning out to every configured channel
///
/// Built once per configuration snapshot; reconfiguring means building a new one.
pub struct NotificationDispatcher {
    senders: Vec<Arc<dyn NotificationSender>>,
    log_repo: Arc<dyn NotificationLogRepository>,
}

impl NotificationDispatcher {
    pub fn new(
        senders: Vec<Arc<dyn NotificationSender>>,
        log_repo: Arc<dyn NotificationLogRepository>,
    ) -> Self {
        Self { senders, log_repo }
    }

    pub fn channel_count(&self) -> usize {
        self.senders.len()
    }

    /// Send to every channel in order, recording one audit entry per attempt.
    ///
    /// Succeeds if any channel delivered. When all fail the last error is
    /// returned.
    pub async fn send_notification(
        &self,
        record: &DomainRecord,
        days_remaining: i64,
    ) -> Result<DispatchSummary, SendError> {
        if self.senders.is_empty() {
            warn!(
                "No notification channels configured, cannot notify for {}",
                record.name()
            );
            return Err(SendError::NoChannelsConfigured);
        }

        let mut summary = DispatchSummary {
            delivered: 0,
            failed: 0,
        };
        let mut last_error = None;

        for sender in &self.senders {
            let channel = sender.channel_type();

            let outcome = match sender.send(record, days_remaining).await {
                Ok(()) => {
                    info!("Notified {} via {}", record.name(), channel);
                    summary.delivered += 1;
                    NotificationOutcome::Success
                }
                Err(e) => {
                    error!(
                        "Failed to notify {} via {}: {}",
                        record.name(),
                        channel,
                        e
                    );
                    summary.failed += 1;
                    last_error = Some(e);
                    NotificationOutcome::Failed
                }
            };

            let entry = NotificationRecord::for_attempt(record, channel, outcome);
            if let Err(e) = self.log_repo.append(&entry).await {
                error!(
                    "Failed to record {} notification for {}: {}",
                    channel,
                    record.name(),
                    e
                );
            }
        }

        if summary.delivered > 0 {
            return Ok(summary);
        }

        Err(last_error.unwrap_or(SendError::NoChannelsConfigured))
    }
}
