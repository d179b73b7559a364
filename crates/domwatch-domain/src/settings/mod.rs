use async_trait::async_trait;
use std::collections::HashMap;

use crate::shared::DomainError;

/// Persisted key/value settings that override the file configuration at startup
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn find_all(&self) -> Result<HashMap<String, String>, DomainError>;

    /// Insert or replace one setting
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
