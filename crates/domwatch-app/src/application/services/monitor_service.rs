use chrono::Utc;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::instrument;

use domwatch_domain::domain_record::DomainRecordRepository;
use domwatch_domain::lookup::DomainLookup;
use domwatch_domain::monitor::AlertThresholds;
use domwatch_domain::notification::SendError;
use domwatch_domain::shared::DomainError;
use domwatch_domain::DomainRecord;

use super::notification_dispatcher::{DispatchSummary, NotificationDispatcher};

/// Counts for one pass over the active domains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchCheckSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Monitor engine: lookup, record update, threshold evaluation
pub struct MonitorService {
    lookup: Arc<dyn DomainLookup>,
    domain_repo: Arc<dyn DomainRecordRepository>,
    dispatcher: Arc<NotificationDispatcher>,
    thresholds: AlertThresholds,
}

impl MonitorService {
    pub fn new(
        lookup: Arc<dyn DomainLookup>,
        domain_repo: Arc<dyn DomainRecordRepository>,
        dispatcher: Arc<NotificationDispatcher>,
        thresholds: AlertThresholds,
    ) -> Self {
        Self {
            lookup,
            domain_repo,
            dispatcher,
            thresholds,
        }
    }

    /// Look the domain up, persist the fresh facts, then evaluate thresholds.
    ///
    /// On lookup failure the record is left untouched and nothing is saved.
    /// Returns the threshold that fired, if any.
    #[instrument(skip(self, record), fields(domain = %record.name()))]
    pub async fn check_domain(&self, record: &mut DomainRecord) -> Result<Option<i64>, DomainError> {
        let facts = self.lookup.lookup(record.name()).await?;

        if facts.expiry_date.is_none() {
            warn!(
                "Lookup for {} returned no expiry date, keeping previous countdown",
                record.name()
            );
        }

        record.apply_lookup(&facts, Utc::now());
        self.domain_repo.save(record).await?;

        info!(
            "Checked {}: {} days remaining",
            record.name(),
            record.days_remaining()
        );

        Ok(self.check_and_notify(record).await)
    }

    /// Check every active domain; one failing domain never stops the batch
    #[instrument(skip(self))]
    pub async fn check_all_domains(&self) -> Result<BatchCheckSummary, DomainError> {
        let records = self.domain_repo.find_active().await?;

        let mut summary = BatchCheckSummary {
            total: records.len(),
            ..Default::default()
        };

        for mut record in records {
            match self.check_domain(&mut record).await {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    error!("Check failed for {}: {}", record.name(), e.format_with_code());
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Batch check finished: {} total, {} ok, {} failed",
            summary.total, summary.succeeded, summary.failed
        );
        Ok(summary)
    }

    /// Dispatch once if the countdown equals a configured threshold.
    ///
    /// Thresholds are walked in configured order and only the first exact
    /// match fires. A failed dispatch is logged, not returned.
    pub async fn check_and_notify(&self, record: &DomainRecord) -> Option<i64> {
        let threshold = self.thresholds.first_match(record.days_remaining())?;

        info!(
            "{} reached the {}-day threshold, notifying",
            record.name(),
            threshold
        );

        if let Err(e) = self
            .dispatcher
            .send_notification(record, record.days_remaining())
            .await
        {
            error!("Notification for {} failed: {}", record.name(), e);
        }

        Some(threshold)
    }

    /// Dispatch with the current countdown regardless of thresholds
    pub async fn trigger_notification(
        &self,
        record: &DomainRecord,
    ) -> Result<DispatchSummary, SendError> {
        self.dispatcher
            .send_notification(record, record.days_remaining())
            .await
    }

    /// Run `check_domain` on a detached task; the caller does not wait
    pub fn spawn_check(self: &Arc<Self>, mut record: DomainRecord) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = monitor.check_domain(&mut record).await {
                warn!("Background check for {} failed: {}", record.name(), e);
            }
        })
    }
}
