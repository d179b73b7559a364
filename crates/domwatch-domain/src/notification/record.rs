use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::value_objects::ChannelType;
use crate::domain_record::DomainRecord;
use crate::shared::{DomainError, DomainId, NotificationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationOutcome {
    Success,
    Failed,
}

impl NotificationOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationOutcome::Success => "success",
            NotificationOutcome::Failed => "failed",
        }
    }
}

impl FromStr for NotificationOutcome {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(NotificationOutcome::Success),
            "failed" => Ok(NotificationOutcome::Failed),
            _ => Err(DomainError::InvalidInput(format!(
                "Unknown notification outcome: {s}"
            ))),
        }
    }
}

impl fmt::Display for NotificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audit entry for one delivery attempt on one channel. Never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    id: NotificationId,
    domain_id: DomainId,
    channel: ChannelType,
    content: String,
    outcome: NotificationOutcome,
    sent_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn for_attempt(
        record: &DomainRecord,
        channel: ChannelType,
        outcome: NotificationOutcome,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            domain_id: record.id().clone(),
            channel,
            content: format!(
                "Domain {} expires in {} days",
                record.name(),
                record.days_remaining()
            ),
            outcome,
            sent_at: Utc::now(),
        }
    }

    /// Reconstruct from persistence
    pub fn from_persistence(
        id: NotificationId,
        domain_id: DomainId,
        channel: ChannelType,
        content: String,
        outcome: NotificationOutcome,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            domain_id,
            channel,
            content,
            outcome,
            sent_at,
        }
    }

    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    pub fn domain_id(&self) -> &DomainId {
        &self.domain_id
    }

    pub fn channel(&self) -> ChannelType {
        self.channel
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn outcome(&self) -> NotificationOutcome {
        self.outcome
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }
}
