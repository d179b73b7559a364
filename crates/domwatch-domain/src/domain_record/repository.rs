use async_trait::async_trait;

use super::DomainRecord;
use crate::shared::{DomainError, DomainId};

/// Domain record repository trait
#[async_trait]
pub trait DomainRecordRepository: Send + Sync {
    /// Insert or overwrite a record, keyed by id
    async fn save(&self, record: &DomainRecord) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &DomainId) -> Result<Option<DomainRecord>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<DomainRecord>, DomainError>;

    async fn find_all(&self) -> Result<Vec<DomainRecord>, DomainError>;

    /// Find every record with monitoring enabled
    async fn find_active(&self) -> Result<Vec<DomainRecord>, DomainError>;

    async fn delete(&self, id: &DomainId) -> Result<(), DomainError>;
}
