use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

use domwatch_domain::notification::{
    ChannelType, NotificationLogRepository, NotificationOutcome, NotificationRecord,
};
use domwatch_domain::shared::{DomainError, DomainId, NotificationId};

use crate::persistence::SqliteRepositoryBase;

#[derive(FromRow)]
struct NotificationRow {
    id: String,
    domain_id: String,
    channel: String,
    content: String,
    outcome: String,
    sent_at: DateTime<Utc>,
}

impl NotificationRow {
    fn into_record(self) -> Result<NotificationRecord, DomainError> {
        Ok(NotificationRecord::from_persistence(
            NotificationId::from_string(&self.id),
            DomainId::from_string(&self.domain_id),
            ChannelType::from_str(&self.channel)?,
            self.content,
            NotificationOutcome::from_str(&self.outcome)?,
            self.sent_at,
        ))
    }
}

pub struct SqliteNotificationLogRepository {
    base: SqliteRepositoryBase,
}

impl SqliteNotificationLogRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self {
            base: SqliteRepositoryBase::new(pool),
        }
    }
}

#[async_trait]
impl NotificationLogRepository for SqliteNotificationLogRepository {
    async fn append(&self, record: &NotificationRecord) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO notifications (id, domain_id, channel, content, outcome, sent_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#;

        self.base
            .execute(
                sqlx::query(query)
                    .bind(record.id().as_str())
                    .bind(record.domain_id().as_str())
                    .bind(record.channel().as_str())
                    .bind(record.content())
                    .bind(record.outcome().as_str())
                    .bind(record.sent_at()),
                "Append notification record",
            )
            .await?;

        Ok(())
    }

    async fn find_recent(&self, limit: u32) -> Result<Vec<NotificationRecord>, DomainError> {
        let query = r#"
            SELECT id, domain_id, channel, content, outcome, sent_at
            FROM notifications
            ORDER BY sent_at DESC, rowid DESC
            LIMIT ?1
        "#;

        let rows: Vec<NotificationRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(i64::from(limit)),
                "Find recent notifications",
            )
            .await?;

        rows.into_iter().map(NotificationRow::into_record).collect()
    }

    async fn find_by_domain(
        &self,
        domain_id: &DomainId,
    ) -> Result<Vec<NotificationRecord>, DomainError> {
        let query = r#"
            SELECT id, domain_id, channel, content, outcome, sent_at
            FROM notifications
            WHERE domain_id = ?1
            ORDER BY sent_at DESC, rowid DESC
        "#;

        let rows: Vec<NotificationRow> = self
            .base
            .fetch_all(
                sqlx::query_as(query).bind(domain_id.as_str()),
                "Find notifications by domain",
            )
            .await?;

        rows.into_iter().map(NotificationRow::into_record).collect()
    }
}
