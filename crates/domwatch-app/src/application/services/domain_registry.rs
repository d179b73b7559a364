use log::{info, warn};
use std::sync::Arc;

use domwatch_domain::domain_record::{normalize_domain_name, DomainRecordRepository};
use domwatch_domain::shared::{DomainError, DomainId};
use domwatch_domain::DomainRecord;

use super::monitor_service::MonitorService;
use super::notification_dispatcher::DispatchSummary;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: Vec<String>,
    pub invalid: usize,
    pub duplicates: usize,
}

/// Registration and administrative actions on monitored domains
pub struct DomainRegistry {
    domain_repo: Arc<dyn DomainRecordRepository>,
    monitor: Arc<MonitorService>,
}

impl DomainRegistry {
    pub fn new(domain_repo: Arc<dyn DomainRecordRepository>, monitor: Arc<MonitorService>) -> Self {
        Self {
            domain_repo,
            monitor,
        }
    }

    /// Register one domain and start its first check in the background
    pub async fn register(&self, name: &str, tags: &str) -> Result<DomainRecord, DomainError> {
        let record = DomainRecord::new(name, tags)?;

        if self.domain_repo.find_by_name(record.name()).await?.is_some() {
            return Err(DomainError::AlreadyExists(format!(
                "Domain {} is already monitored",
                record.name()
            )));
        }

        self.domain_repo.save(&record).await?;
        info!("Registered {}", record.name());

        self.monitor.spawn_check(record.clone());
        Ok(record)
    }

    /// Bulk registration; invalid and already-known names are skipped
    pub async fn import(&self, names: &[String]) -> Result<ImportSummary, DomainError> {
        let mut summary = ImportSummary::default();

        for raw in names {
            let name = match normalize_domain_name(raw) {
                Ok(name) => name,
                Err(e) => {
                    warn!("Skipping import entry '{}': {}", raw, e);
                    summary.invalid += 1;
                    continue;
                }
            };

            if self.domain_repo.find_by_name(&name).await?.is_some() {
                summary.duplicates += 1;
                continue;
            }

            let record = DomainRecord::new(&name, "")?;
            self.domain_repo.save(&record).await?;
            self.monitor.spawn_check(record);
            summary.created.push(name);
        }

        info!(
            "Imported {} domains ({} invalid, {} duplicates)",
            summary.created.len(),
            summary.invalid,
            summary.duplicates
        );
        Ok(summary)
    }

    /// Re-check a domain now and return the updated record
    pub async fn refresh(&self, id: &DomainId) -> Result<DomainRecord, DomainError> {
        let mut record = self.load(id).await?;
        self.monitor.check_domain(&mut record).await?;
        Ok(record)
    }

    /// Send a notification for the domain regardless of thresholds
    pub async fn send_test_notification(&self, id: &DomainId) -> Result<DispatchSummary, DomainError> {
        let record = self.load(id).await?;
        Ok(self.monitor.trigger_notification(&record).await?)
    }

    async fn load(&self, id: &DomainId) -> Result<DomainRecord, DomainError> {
        self.domain_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Domain {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::notification_dispatcher::NotificationDispatcher;
    use crate::application::services::test_support::{
        facts_expiring_in, ok_sender, InMemoryDomainRepository, InMemoryNotificationLog,
        MockLookup,
    };
    use domwatch_domain::lookup::LookupError;
    use domwatch_domain::monitor::AlertThresholds;
    use domwatch_domain::notification::{ChannelType, NotificationSender, SendError};
    use domwatch_domain::shared::ErrorCode;

    fn registry_with(
        lookup: MockLookup,
        senders: Vec<Arc<dyn NotificationSender>>,
    ) -> (DomainRegistry, Arc<InMemoryDomainRepository>) {
        let repo = Arc::new(InMemoryDomainRepository::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            senders,
            Arc::new(InMemoryNotificationLog::new()),
        ));
        let monitor = Arc::new(MonitorService::new(
            Arc::new(lookup),
            repo.clone(),
            dispatcher,
            AlertThresholds::new(vec![30]).unwrap(),
        ));
        (DomainRegistry::new(repo.clone(), monitor), repo)
    }

    fn lookup_expiring_in(days: i64) -> MockLookup {
        let mut lookup = MockLookup::new();
        lookup
            .expect_lookup()
            .returning(move |domain| Ok(facts_expiring_in(domain, days)));
        lookup
    }

    #[tokio::test]
    async fn test_register_normalizes_and_rejects_duplicates() {
        let (registry, repo) = registry_with(lookup_expiring_in(90), Vec::new());

        let record = registry.register(" Example.COM ", "prod").await.unwrap();
        assert_eq!(record.name(), "example.com");
        assert!(repo.get("example.com").await.is_some());

        let err = registry.register("example.com", "").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlreadyExists);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_name() {
        let (registry, _) = registry_with(MockLookup::new(), Vec::new());
        let err = registry.register("not a domain", "").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_import_counts_skips() {
        let (registry, repo) = registry_with(lookup_expiring_in(90), Vec::new());
        registry.register("existing.com", "").await.unwrap();

        let names: Vec<String> = ["a.com", "", "existing.com", "b.org", "A.com", "nodot"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let summary = registry.import(&names).await.unwrap();

        assert_eq!(summary.created, vec!["a.com".to_string(), "b.org".to_string()]);
        assert_eq!(summary.invalid, 2);
        assert_eq!(summary.duplicates, 2);
        assert!(repo.get("b.org").await.is_some());
    }

    #[tokio::test]
    async fn test_refresh_runs_check_synchronously() {
        let (registry, repo) = registry_with(lookup_expiring_in(42), Vec::new());
        let record = DomainRecord::new("example.com", "").unwrap();
        repo.save(&record).await.unwrap();

        let refreshed = registry.refresh(record.id()).await.unwrap();
        assert_eq!(refreshed.days_remaining(), 42);
        assert_eq!(repo.get("example.com").await.unwrap().days_remaining(), 42);
    }

    #[tokio::test]
    async fn test_refresh_surfaces_lookup_error() {
        let mut lookup = MockLookup::new();
        lookup
            .expect_lookup()
            .returning(|_| Err(LookupError::MissingPayload));
        let (registry, repo) = registry_with(lookup, Vec::new());
        let record = DomainRecord::new("example.com", "").unwrap();
        repo.save(&record).await.unwrap();

        let err = registry.refresh(record.id()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::LookupFailed);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let (registry, _) = registry_with(MockLookup::new(), Vec::new());
        let err = registry.refresh(&DomainId::new()).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_send_test_notification() {
        let (registry, repo) =
            registry_with(MockLookup::new(), vec![ok_sender(ChannelType::DingTalk)]);
        let record = DomainRecord::new("example.com", "").unwrap();
        repo.save(&record).await.unwrap();

        let summary = registry.send_test_notification(record.id()).await.unwrap();
        assert_eq!(summary.delivered, 1);
    }

    #[tokio::test]
    async fn test_send_test_notification_without_channels() {
        let (registry, repo) = registry_with(MockLookup::new(), Vec::new());
        let record = DomainRecord::new("example.com", "").unwrap();
        repo.save(&record).await.unwrap();

        let err = registry.send_test_notification(record.id()).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Notification(SendError::NoChannelsConfigured)
        ));
    }
}
