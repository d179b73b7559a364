use async_trait::async_trait;

use super::record::NotificationRecord;
use crate::shared::{DomainError, DomainId};

/// Append-only store for delivery attempts
#[async_trait]
pub trait NotificationLogRepository: Send + Sync {
    async fn append(&self, record: &NotificationRecord) -> Result<(), DomainError>;

    /// Most recent attempts first
    async fn find_recent(&self, limit: u32) -> Result<Vec<NotificationRecord>, DomainError>;

    async fn find_by_domain(
        &self,
        domain_id: &DomainId,
    ) -> Result<Vec<NotificationRecord>, DomainError>;
}
