mod date_parser;

pub use date_parser::parse_date;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use domwatch_domain::lookup::{DomainFacts, DomainLookup, LookupError};

/// Response envelope of the WHOIS API: `{code, msg, data}`
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Option<Map<String, Value>>,
}

/// HTTP client for a JSON WHOIS lookup API
pub struct WhoisApiClient {
    api_url: Url,
    client: Client,
}

impl WhoisApiClient {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let api_url = Url::parse(api_url)
            .map_err(|e| LookupError::InvalidEndpoint(format!("{}: {}", api_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| LookupError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { api_url, client })
    }

    fn build_query_url(&self, domain: &str) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut().append_pair("domain", domain);
        url
    }
}

#[async_trait]
impl DomainLookup for WhoisApiClient {
    #[instrument(skip(self))]
    async fn lookup(&self, domain: &str) -> Result<DomainFacts, LookupError> {
        let url = self.build_query_url(domain);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let facts = parse_response(domain, &body)?;
        debug!(
            registrar = %facts.registrar,
            has_expiry = facts.expiry_date.is_some(),
            "Lookup succeeded"
        );
        Ok(facts)
    }
}

/// Decode an API response body into domain facts
pub fn parse_response(domain: &str, body: &str) -> Result<DomainFacts, LookupError> {
    let envelope: ApiEnvelope =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;

    if envelope.code != 0 {
        return Err(LookupError::Remote {
            code: envelope.code,
            message: envelope.msg,
        });
    }

    let data = envelope.data.ok_or(LookupError::MissingPayload)?;
    Ok(extract_facts(domain, &data))
}

fn extract_facts(domain: &str, data: &Map<String, Value>) -> DomainFacts {
    let mut facts = DomainFacts::new(domain);

    if let Some(registrar) = data.get("registrar").and_then(Value::as_str) {
        facts.registrar = registrar.to_string();
    }

    // Status is a list; only the first entry is kept
    if let Some(first) = data
        .get("status")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
    {
        let text = match first {
            Value::Object(obj) => obj.get("text").and_then(Value::as_str),
            Value::String(s) => Some(s.as_str()),
            _ => None,
        };
        if let Some(text) = text {
            facts.status = text.to_string();
        }
    }

    let date_field = |key: &str| data.get(key).and_then(Value::as_str).and_then(parse_date);
    facts.expiry_date = date_field("expirationDate");
    facts.created_date = date_field("creationDate");
    facts.updated_date = date_field("updatedDate");

    if let Some(servers) = data.get("nameServers").and_then(Value::as_array) {
        facts.name_servers = servers
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }

    facts.raw_data = serde_json::to_string(data).unwrap_or_default();

    facts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_full_payload() {
        let body = r#"{
            "code": 0,
            "msg": "ok",
            "data": {
                "registrar": "NameCheap, Inc.",
                "status": [{"text": "clientTransferProhibited"}, {"text": "ok"}],
                "expirationDate": "2026-03-01T04:00:00Z",
                "creationDate": "2010-03-01 04:00:00",
                "updatedDate": "2024-02-10",
                "nameServers": ["ns1.example.net", "ns2.example.net"]
            }
        }"#;

        let facts = parse_response("example.com", body).unwrap();

        assert_eq!(facts.domain, "example.com");
        assert_eq!(facts.registrar, "NameCheap, Inc.");
        assert_eq!(facts.status, "clientTransferProhibited");
        assert_eq!(
            facts.expiry_date,
            Some(Utc.with_ymd_and_hms(2026, 3, 1, 4, 0, 0).unwrap())
        );
        assert_eq!(
            facts.created_date,
            Some(Utc.with_ymd_and_hms(2010, 3, 1, 4, 0, 0).unwrap())
        );
        assert_eq!(
            facts.updated_date,
            Some(Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(facts.name_servers.len(), 2);
        assert!(facts.raw_data.contains("NameCheap"));
    }

    #[test]
    fn test_partial_payload_is_not_fatal() {
        let body = r#"{"code":0,"msg":"","data":{"expirationDate":"someday","status":[]}}"#;
        let facts = parse_response("example.org", body).unwrap();

        assert!(facts.expiry_date.is_none());
        assert!(facts.registrar.is_empty());
        assert!(facts.status.is_empty());
    }

    #[test]
    fn test_plain_string_status() {
        let body = r#"{"code":0,"data":{"status":["active"]}}"#;
        let facts = parse_response("example.org", body).unwrap();
        assert_eq!(facts.status, "active");
    }

    #[test]
    fn test_remote_error_code() {
        let body = r#"{"code":1001,"msg":"quota exceeded","data":null}"#;
        match parse_response("example.com", body) {
            Err(LookupError::Remote { code, message }) => {
                assert_eq!(code, 1001);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_data() {
        let body = r#"{"code":0,"msg":"ok"}"#;
        assert!(matches!(
            parse_response("example.com", body),
            Err(LookupError::MissingPayload)
        ));
    }

    #[test]
    fn test_garbage_body() {
        assert!(matches!(
            parse_response("example.com", "<html>bad gateway</html>"),
            Err(LookupError::Decode(_))
        ));
    }

    #[test]
    fn test_query_url_keeps_existing_params() {
        let client =
            WhoisApiClient::new("https://api.example.com/whois?key=abc", Duration::from_secs(5))
                .unwrap();
        let url = client.build_query_url("example.com");
        assert_eq!(
            url.as_str(),
            "https://api.example.com/whois?key=abc&domain=example.com"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(matches!(
            WhoisApiClient::new("not a url", Duration::from_secs(5)),
            Err(LookupError::InvalidEndpoint(_))
        ));
    }
}
