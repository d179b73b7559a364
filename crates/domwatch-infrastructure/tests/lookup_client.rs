use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use domwatch_domain::lookup::{DomainLookup, LookupError};
use domwatch_infrastructure::lookup::WhoisApiClient;


async fn whois(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let domain = query.get("domain").cloned().unwrap_or_default();
    if domain == "unknown.test" {
        return Json(json!({"code": 404, "msg": "domain not found", "data": null}));
    }

    Json(json!({
        "code": 0,
        "msg": "ok",
        "data": {
            "domain": domain,
            "registrar": "Example Registrar",
            "status": [{"text": "clientDeleteProhibited"}],
            "expirationDate": "2030-05-01T00:00:00Z",
            "creationDate": "2001-05-01",
            "nameServers": ["ns1.example.net"],
            "apiKey": query.get("key").cloned().unwrap_or_default()
        }
    }))
}

async fn unavailable() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

#[tokio::test]
async fn lookup_parses_successful_response() {
    let app = Router::new().route("/whois", get(whois));
    let addr = test_helpers::spawn_server(app).await;

    let client = WhoisApiClient::new(
        &format!("http://{}/whois?key=k1", addr),
        Duration::from_secs(5),
    )
    .unwrap();

    let facts = client.lookup("example.com").await.expect("lookup");

    assert_eq!(facts.domain, "example.com");
    assert_eq!(facts.registrar, "Example Registrar");
    assert_eq!(facts.status, "clientDeleteProhibited");
    assert_eq!(
        facts.expiry_date,
        Some(Utc.with_ymd_and_hms(2030, 5, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(facts.name_servers, vec!["ns1.example.net".to_string()]);
    // Pre-existing query parameters survive
    assert!(facts.raw_data.contains("\"apiKey\":\"k1\""));
}

#[tokio::test]
async fn lookup_surfaces_remote_error_code() {
    let app = Router::new().route("/whois", get(whois));
    let addr = test_helpers::spawn_server(app).await;

    let client =
        WhoisApiClient::new(&format!("http://{}/whois", addr), Duration::from_secs(5)).unwrap();

    match client.lookup("unknown.test").await {
        Err(LookupError::Remote { code, message }) => {
            assert_eq!(code, 404);
            assert_eq!(message, "domain not found");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn lookup_http_error_status() {
    let app = Router::new().route("/whois", get(unavailable));
    let addr = test_helpers::spawn_server(app).await;

    let client =
        WhoisApiClient::new(&format!("http://{}/whois", addr), Duration::from_secs(5)).unwrap();

    assert!(matches!(
        client.lookup("example.com").await,
        Err(LookupError::HttpStatus(503))
    ));
}
