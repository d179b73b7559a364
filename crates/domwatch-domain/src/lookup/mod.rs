use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration facts returned by a WHOIS-style lookup.
///
/// Every field except `domain` may be empty: a provider answering with
/// partial data is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainFacts {
    pub domain: String,
    pub registrar: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_date: Option<DateTime<Utc>>,
    pub updated_date: Option<DateTime<Utc>>,
    pub status: String,
    pub name_servers: Vec<String>,
    /// Provider payload kept verbatim as JSON
    pub raw_data: String,
}

impl DomainFacts {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("invalid lookup endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("lookup request failed: {0}")]
    Transport(String),

    #[error("lookup API returned status {0}")]
    HttpStatus(u16),

    #[error("failed to decode lookup response: {0}")]
    Decode(String),

    #[error("lookup API error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("no data in lookup response")]
    MissingPayload,
}

/// Source of registration facts for a domain name
#[async_trait]
pub trait DomainLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<DomainFacts, LookupError>;
}
