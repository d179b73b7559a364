use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

use domwatch_domain::settings::SettingsRepository;
use domwatch_domain::shared::DomainError;

use crate::persistence::SqliteRepositoryBase;

#[derive(FromRow)]
struct SettingRow {
    key: String,
    value: String,
}

pub struct SqliteSettingsRepository {
    base: SqliteRepositoryBase,
}

impl SqliteSettingsRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepository {
    async fn find_all(&self) -> Result<HashMap<String, String>, DomainError> {
        let rows: Vec<SettingRow> = self
            .base
            .fetch_all(
                sqlx::query_as("SELECT key, value FROM settings"),
                "Load settings",
            )
            .await?;

        Ok(rows.into_iter().map(|r| (r.key, r.value)).collect())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = ?2,
                updated_at = ?3
        "#;

        self.base
            .execute(
                sqlx::query(query).bind(key).bind(value).bind(Utc::now()),
                "Save setting",
            )
            .await?;

        Ok(())
    }
}
