//! Test doubles shared by the service tests

use async_trait::async_trait;
use chrono::{Duration, Utc};
use mockall::mock;
use std::sync::Arc;
use tokio::sync::RwLock;

use domwatch_domain::domain_record::DomainRecordRepository;
use domwatch_domain::lookup::{DomainFacts, DomainLookup, LookupError};
use domwatch_domain::notification::{
    ChannelType, NotificationLogRepository, NotificationRecord, NotificationSender, SendError,
};
use domwatch_domain::shared::{DomainError, DomainId};
use domwatch_domain::DomainRecord;

mock! {
    pub Lookup {}

    #[async_trait]
    impl DomainLookup for Lookup {
        async fn lookup(&self, domain: &str) -> Result<DomainFacts, LookupError>;
    }
}

mock! {
    pub Sender {}

    #[async_trait]
    impl NotificationSender for Sender {
        fn channel_type(&self) -> ChannelType;
        async fn send(&self, record: &DomainRecord, days_remaining: i64) -> Result<(), SendError>;
    }
}

/// Sender that must be called exactly once and succeeds
pub fn ok_sender(channel: ChannelType) -> Arc<dyn NotificationSender> {
    let mut sender = MockSender::new();
    sender.expect_channel_type().return_const(channel);
    sender.expect_send().times(1).returning(|_, _| Ok(()));
    Arc::new(sender)
}

/// Sender that must be called exactly once and fails with `error`
pub fn failing_sender(channel: ChannelType, error: SendError) -> Arc<dyn NotificationSender> {
    let mut sender = MockSender::new();
    let mut error = Some(error);
    sender.expect_channel_type().return_const(channel);
    sender
        .expect_send()
        .times(1)
        .returning(move |_, _| Err(error.take().unwrap_or(SendError::NoChannelsConfigured)));
    Arc::new(sender)
}

/// Lookup facts with an expiry `days` (plus a margin) from now
pub fn facts_expiring_in(domain: &str, days: i64) -> DomainFacts {
    DomainFacts {
        domain: domain.to_string(),
        registrar: "Example Registrar".to_string(),
        expiry_date: Some(Utc::now() + Duration::days(days) + Duration::hours(1)),
        status: "ok".to_string(),
        ..Default::default()
    }
}

/// Record as it looks after a successful lookup `days` before expiry
pub fn checked_record(name: &str, days: i64) -> DomainRecord {
    let mut record = DomainRecord::new(name, "").unwrap();
    record.apply_lookup(&facts_expiring_in(name, days), Utc::now());
    record
}

pub struct InMemoryDomainRepository {
    records: RwLock<Vec<DomainRecord>>,
    fail_saves: bool,
}

impl InMemoryDomainRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            fail_saves: false,
        }
    }

    /// Repository whose every save fails
    pub fn failing_saves() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            fail_saves: true,
        }
    }

    pub async fn with_records(records: Vec<DomainRecord>) -> Self {
        let repo = Self::new();
        *repo.records.write().await = records;
        repo
    }

    pub async fn get(&self, name: &str) -> Option<DomainRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.name() == name)
            .cloned()
    }
}

#[async_trait]
impl DomainRecordRepository for InMemoryDomainRepository {
    async fn save(&self, record: &DomainRecord) -> Result<(), DomainError> {
        if self.fail_saves {
            return Err(DomainError::Repository("disk I/O error".to_string()));
        }
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &DomainId) -> Result<Option<DomainRecord>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<DomainRecord>, DomainError> {
        Ok(self.get(name).await)
    }

    async fn find_all(&self) -> Result<Vec<DomainRecord>, DomainError> {
        Ok(self.records.read().await.clone())
    }

    async fn find_active(&self) -> Result<Vec<DomainRecord>, DomainError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.is_active())
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &DomainId) -> Result<(), DomainError> {
        self.records.write().await.retain(|r| r.id() != id);
        Ok(())
    }
}

pub struct InMemoryNotificationLog {
    entries: RwLock<Vec<NotificationRecord>>,
    fail_appends: bool,
}

impl InMemoryNotificationLog {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            fail_appends: false,
        }
    }

    /// Log whose every append fails
    pub fn failing() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            fail_appends: true,
        }
    }

    pub async fn entries(&self) -> Vec<NotificationRecord> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl NotificationLogRepository for InMemoryNotificationLog {
    async fn append(&self, record: &NotificationRecord) -> Result<(), DomainError> {
        if self.fail_appends {
            return Err(DomainError::Repository("disk full".to_string()));
        }
        self.entries.write().await.push(record.clone());
        Ok(())
    }

    async fn find_recent(&self, limit: u32) -> Result<Vec<NotificationRecord>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_domain(
        &self,
        domain_id: &DomainId,
    ) -> Result<Vec<NotificationRecord>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.domain_id() == domain_id)
            .cloned()
            .collect())
    }
}
