use chrono::{DateTime, Local};
use serde_json::{json, Value};

use domwatch_domain::notification::UrgencyTier;
use domwatch_domain::DomainRecord;

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "unknown"
    } else {
        value
    }
}

/// Subject line for the mail channel
pub fn mail_subject(record: &DomainRecord, days_remaining: i64) -> String {
    format!(
        "Domain expiry warning: {} expires in {} days",
        record.name(),
        days_remaining
    )
}

/// Plaintext mail body with an urgency tier banner
pub fn mail_body(record: &DomainRecord, days_remaining: i64, now: DateTime<Local>) -> String {
    let tier = UrgencyTier::from_days(days_remaining);
    let expiry = record.expiry_date_label();

    format!(
        "Domain expiry warning\n\n\
         Urgency: {} {}\n\
         Domain: {}\n\
         Days remaining: {}\n\
         Expiry date: {}\n\
         Registrar: {}\n\
         Domain status: {}\n\
         Checked at: {}\n\n\
         Renew the domain before it lapses.\n",
        tier.marker(),
        tier.label(),
        record.name(),
        days_remaining,
        or_unknown(&expiry),
        or_unknown(record.registrar()),
        or_unknown(record.status()),
        now.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// JSON body for the generic webhook channel
pub fn webhook_payload(record: &DomainRecord, days_remaining: i64) -> Value {
    json!({
        "domain": record.name(),
        "days_remaining": days_remaining,
        "expiry_date": record.expiry_date_label(),
        "registrar": record.registrar(),
        "status": record.status(),
    })
}

/// Chat text for the Telegram channel
pub fn telegram_text(record: &DomainRecord, days_remaining: i64) -> String {
    format!(
        "⚠️ Domain expiry warning\n\nDomain: {}\nDays remaining: {}\nExpiry date: {}\nRegistrar: {}",
        record.name(),
        days_remaining,
        or_unknown(&record.expiry_date_label()),
        or_unknown(record.registrar()),
    )
}

/// Markdown robot message for the DingTalk channel
pub fn dingtalk_markdown(record: &DomainRecord, days_remaining: i64) -> Value {
    let tier = UrgencyTier::from_days(days_remaining);
    let text = format!(
        "## {} Domain expiry warning\n\n\
         **Domain**: {}\n\n\
         **Days remaining**: {}\n\n\
         **Expiry date**: {}\n\n\
         **Registrar**: {}\n\n\
         **Status**: {}",
        tier.marker(),
        record.name(),
        days_remaining,
        or_unknown(&record.expiry_date_label()),
        or_unknown(record.registrar()),
        or_unknown(record.status()),
    );

    json!({
        "msgtype": "markdown",
        "markdown": {
            "title": "Domain expiry warning",
            "text": text
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use domwatch_domain::lookup::DomainFacts;

    fn checked_record(days: i64) -> DomainRecord {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut record = DomainRecord::new("example.com", "").unwrap();
        record.apply_lookup(
            &DomainFacts {
                domain: "example.com".to_string(),
                registrar: "Example Registrar".to_string(),
                expiry_date: Some(now + Duration::days(days)),
                status: "ok".to_string(),
                ..Default::default()
            },
            now,
        );
        record
    }

    #[test]
    fn test_mail_body_tiers() {
        let now = Local::now();
        assert!(mail_body(&checked_record(3), 3, now).contains("🔴 CRITICAL"));
        assert!(mail_body(&checked_record(14), 14, now).contains("🟡 WARNING"));
        assert!(mail_body(&checked_record(60), 60, now).contains("🟢 NORMAL"));
    }

    #[test]
    fn test_mail_body_fields() {
        let body = mail_body(&checked_record(7), 7, Local::now());
        assert!(body.contains("Domain: example.com"));
        assert!(body.contains("Days remaining: 7"));
        assert!(body.contains("Expiry date: 2025-01-08"));
        assert!(body.contains("Registrar: Example Registrar"));
    }

    #[test]
    fn test_unchecked_record_shows_unknown() {
        let record = DomainRecord::new("example.com", "").unwrap();
        let text = telegram_text(&record, 0);
        assert!(text.contains("Expiry date: unknown"));
        assert!(text.contains("Registrar: unknown"));
    }

    #[test]
    fn test_webhook_payload_shape() {
        let payload = webhook_payload(&checked_record(30), 30);
        assert_eq!(payload["domain"], "example.com");
        assert_eq!(payload["days_remaining"], 30);
        assert_eq!(payload["expiry_date"], "2025-01-31");
        assert_eq!(payload["registrar"], "Example Registrar");
        assert_eq!(payload["status"], "ok");
    }

    #[test]
    fn test_dingtalk_markdown_shape() {
        let payload = dingtalk_markdown(&checked_record(1), 1);
        assert_eq!(payload["msgtype"], "markdown");
        let text = payload["markdown"]["text"].as_str().unwrap();
        assert!(text.starts_with("## 🔴"));
        assert!(text.contains("**Domain**: example.com"));
    }

    #[test]
    fn test_subject() {
        assert_eq!(
            mail_subject(&checked_record(14), 14),
            "Domain expiry warning: example.com expires in 14 days"
        );
    }
}
