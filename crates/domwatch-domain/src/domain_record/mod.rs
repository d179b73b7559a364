mod repository;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lookup::DomainFacts;
use crate::shared::{DomainError, DomainId};

pub use repository::DomainRecordRepository;

const MAX_DOMAIN_NAME_LEN: usize = 253;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Whole days from `now` until `expiry`, rounded toward negative infinity.
///
/// A domain that expired 1 ms ago has -1 days remaining, not 0.
pub fn days_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Normalize and validate a domain name for registration
pub fn normalize_domain_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim().trim_end_matches('.').to_lowercase();

    if name.is_empty() {
        return Err(DomainError::Validation(
            "Domain name cannot be empty".to_string(),
        ));
    }
    if name.len() > MAX_DOMAIN_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "Domain name exceeds {} characters: {}",
            MAX_DOMAIN_NAME_LEN, name
        )));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(DomainError::Validation(format!(
            "Domain name cannot contain whitespace: {}",
            name
        )));
    }
    if !name.contains('.') || name.starts_with('.') {
        return Err(DomainError::Validation(format!(
            "Domain name must be fully qualified: {}",
            name
        )));
    }

    Ok(name)
}

/// DomainRecord aggregate root
///
/// The monitoring fields (registrar, dates, status, countdown) are only
/// written by [`DomainRecord::apply_lookup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRecord {
    id: DomainId,
    name: String,
    registrar: String,
    expiry_date: Option<DateTime<Utc>>,
    created_date: Option<DateTime<Utc>>,
    updated_date: Option<DateTime<Utc>>,
    status: String,
    name_servers: Vec<String>,
    days_remaining: i64,
    tags: String,
    last_checked: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Field bundle used to rebuild a record from storage
#[derive(Debug, Clone)]
pub struct DomainRecordSnapshot {
    pub id: DomainId,
    pub name: String,
    pub registrar: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
    pub status: String,
    pub name_servers: Vec<String>,
    pub days_remaining: i64,
    pub tags: String,
    pub last_checked: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DomainRecord {
    /// Register a new domain for monitoring
    pub fn new(name: &str, tags: impl Into<String>) -> Result<Self, DomainError> {
        let name = normalize_domain_name(name)?;
        let now = Utc::now();

        Ok(Self {
            id: DomainId::new(),
            name,
            registrar: String::new(),
            expiry_date: None,
            created_date: None,
            updated_date: None,
            status: String::new(),
            name_servers: Vec::new(),
            days_remaining: 0,
            tags: tags.into(),
            last_checked: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstruct from persistence
    pub fn from_persistence(snapshot: DomainRecordSnapshot) -> Self {
        Self {
            id: snapshot.id,
            name: snapshot.name,
            registrar: snapshot.registrar,
            expiry_date: snapshot.expiry_date,
            created_date: snapshot.created_date,
            updated_date: snapshot.updated_date,
            status: snapshot.status,
            name_servers: snapshot.name_servers,
            days_remaining: snapshot.days_remaining,
            tags: snapshot.tags,
            last_checked: snapshot.last_checked,
            is_active: snapshot.is_active,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }

    // Getters
    pub fn id(&self) -> &DomainId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registrar(&self) -> &str {
        &self.registrar
    }

    pub fn expiry_date(&self) -> Option<DateTime<Utc>> {
        self.expiry_date
    }

    pub fn created_date(&self) -> Option<DateTime<Utc>> {
        self.created_date
    }

    pub fn updated_date(&self) -> Option<DateTime<Utc>> {
        self.updated_date
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn name_servers(&self) -> &[String] {
        &self.name_servers
    }

    pub fn days_remaining(&self) -> i64 {
        self.days_remaining
    }

    pub fn tags(&self) -> &str {
        &self.tags
    }

    pub fn last_checked(&self) -> Option<DateTime<Utc>> {
        self.last_checked
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Expiry date as `YYYY-MM-DD`, empty when unknown
    pub fn expiry_date_label(&self) -> String {
        self.expiry_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    // Business methods

    /// Overwrite the monitoring fields with a fresh lookup result.
    ///
    /// `days_remaining` is only recomputed when the facts carry an expiry
    /// date; otherwise the previous countdown is kept.
    pub fn apply_lookup(&mut self, facts: &DomainFacts, now: DateTime<Utc>) {
        self.registrar = facts.registrar.clone();
        self.expiry_date = facts.expiry_date;
        self.created_date = facts.created_date;
        self.updated_date = facts.updated_date;
        self.status = facts.status.clone();
        self.name_servers = facts.name_servers.clone();
        self.last_checked = Some(now);

        if let Some(expiry) = facts.expiry_date {
            self.days_remaining = days_until(expiry, now);
        }

        self.updated_at = now;
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }
}
