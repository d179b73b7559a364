use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use domwatch_domain::domain_record::{DomainRecord, DomainRecordRepository, DomainRecordSnapshot};
use domwatch_domain::shared::{DomainError, DomainId};

use crate::persistence::{RepositoryErrorMapper, SqliteRepositoryBase};

const SELECT_COLUMNS: &str = "SELECT id, name, registrar, expiry_date, created_date, updated_date, \
     status, name_servers, days_remaining, tags, last_checked, is_active, created_at, updated_at \
     FROM domains";

#[derive(FromRow)]
struct DomainRow {
    id: String,
    name: String,
    registrar: String,
    expiry_date: Option<DateTime<Utc>>,
    created_date: Option<DateTime<Utc>>,
    updated_date: Option<DateTime<Utc>>,
    status: String,
    name_servers: String,
    days_remaining: i64,
    tags: String,
    last_checked: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DomainRow {
    fn into_record(self) -> Result<DomainRecord, DomainError> {
        let name_servers: Vec<String> = serde_json::from_str(&self.name_servers)
            .map_err(|e| RepositoryErrorMapper::map_json_error(e, "Deserialize name servers"))?;

        Ok(DomainRecord::from_persistence(DomainRecordSnapshot {
            id: DomainId::from_string(&self.id),
            name: self.name,
            registrar: self.registrar,
            expiry_date: self.expiry_date,
            created_date: self.created_date,
            updated_date: self.updated_date,
            status: self.status,
            name_servers,
            days_remaining: self.days_remaining,
            tags: self.tags,
            last_checked: self.last_checked,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

fn into_records(rows: Vec<DomainRow>) -> Result<Vec<DomainRecord>, DomainError> {
    rows.into_iter().map(DomainRow::into_record).collect()
}

pub struct SqliteDomainRecordRepository {
    base: SqliteRepositoryBase,
}

impl SqliteDomainRecordRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl DomainRecordRepository for SqliteDomainRecordRepository {
    async fn save(&self, record: &DomainRecord) -> Result<(), DomainError> {
        let name_servers = serde_json::to_string(record.name_servers())
            .map_err(|e| DomainError::Serialization(format!("Serialize name servers: {}", e)))?;

        let query = r#"
            INSERT INTO domains (
                id, name, registrar, expiry_date, created_date, updated_date, status,
                name_servers, days_remaining, tags, last_checked, is_active, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(id) DO UPDATE SET
                name = ?2,
                registrar = ?3,
                expiry_date = ?4,
                created_date = ?5,
                updated_date = ?6,
                status = ?7,
                name_servers = ?8,
                days_remaining = ?9,
                tags = ?10,
                last_checked = ?11,
                is_active = ?12,
                updated_at = ?14
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(record.id().as_str())
                    .bind(record.name())
                    .bind(record.registrar())
                    .bind(record.expiry_date())
                    .bind(record.created_date())
                    .bind(record.updated_date())
                    .bind(record.status())
                    .bind(name_servers)
                    .bind(record.days_remaining())
                    .bind(record.tags())
                    .bind(record.last_checked())
                    .bind(record.is_active())
                    .bind(record.created_at())
                    .bind(record.updated_at()),
                "Save domain",
            )
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DomainId) -> Result<Option<DomainRecord>, DomainError> {
        let query = format!("{} WHERE id = ?1", SELECT_COLUMNS);

        let row: Option<DomainRow> = self
            .base
            .fetch_optional(sqlx::query_as(&query).bind(id.as_str()), "Find domain by ID")
            .await?;

        row.map(DomainRow::into_record).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<DomainRecord>, DomainError> {
        let query = format!("{} WHERE name = ?1", SELECT_COLUMNS);

        let row: Option<DomainRow> = self
            .base
            .fetch_optional(sqlx::query_as(&query).bind(name), "Find domain by name")
            .await?;

        row.map(DomainRow::into_record).transpose()
    }

    async fn find_all(&self) -> Result<Vec<DomainRecord>, DomainError> {
        let query = format!("{} ORDER BY created_at ASC, name ASC", SELECT_COLUMNS);

        let rows: Vec<DomainRow> = self
            .base
            .fetch_all(sqlx::query_as(&query), "Find all domains")
            .await?;

        into_records(rows)
    }

    async fn find_active(&self) -> Result<Vec<DomainRecord>, DomainError> {
        let query = format!(
            "{} WHERE is_active = 1 ORDER BY created_at ASC, name ASC",
            SELECT_COLUMNS
        );

        let rows: Vec<DomainRow> = self
            .base
            .fetch_all(sqlx::query_as(&query), "Find active domains")
            .await?;

        into_records(rows)
    }

    async fn delete(&self, id: &DomainId) -> Result<(), DomainError> {
        self.base
            .execute(
                sqlx::query("DELETE FROM domains WHERE id = ?1").bind(id.as_str()),
                "Delete domain",
            )
            .await?;

        Ok(())
    }
}
