use async_trait::async_trait;
use chrono::Local;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::{info, warn};

use domwatch_domain::notification::{ChannelType, NotificationSender, SendError};
use domwatch_domain::DomainRecord;

use super::message_builder;

/// Some providers (QQ mail among them) answer the final handshake with a
/// truncated line after the message was already queued.
const BENIGN_SMTP_QUIRK: &str = "short response";

/// Port that expects TLS from the first byte; every other port uses STARTTLS
const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP connection settings
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

/// SMTP mail notification sender
pub struct EmailSender {
    smtp: SmtpSettings,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailSender {
    pub fn new(smtp: SmtpSettings, from: &str, to: &[String]) -> Result<Self, SendError> {
        let from: Mailbox = from
            .trim()
            .parse()
            .map_err(|e| SendError::Configuration(format!("Invalid from address '{}': {}", from, e)))?;

        let to = to
            .iter()
            .map(|addr| addr.trim())
            .filter(|addr| !addr.is_empty())
            .map(|addr| {
                addr.parse::<Mailbox>().map_err(|e| {
                    SendError::Configuration(format!("Invalid recipient '{}': {}", addr, e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if to.is_empty() {
            return Err(SendError::Configuration(
                "At least one recipient is required".to_string(),
            ));
        }

        Ok(Self { smtp, from, to })
    }

    fn build_message(&self, record: &DomainRecord, days_remaining: i64) -> Result<Message, SendError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(message_builder::mail_subject(record, days_remaining))
            .header(ContentType::TEXT_PLAIN);

        for recipient in &self.to {
            builder = builder.to(recipient.clone());
        }

        builder
            .body(message_builder::mail_body(record, days_remaining, Local::now()))
            .map_err(|e| SendError::InvalidMessage(e.to_string()))
    }

    /// A fresh transport per send; nothing is kept between deliveries
    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, SendError> {
        let builder = if self.smtp.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.smtp.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp.host)
        }
        .map_err(|e| SendError::Configuration(format!("Invalid SMTP host: {}", e)))?;

        Ok(builder
            .port(self.smtp.port)
            .credentials(Credentials::new(
                self.smtp.username.clone(),
                self.smtp.password.clone(),
            ))
            .timeout(Some(self.smtp.timeout))
            .build())
    }
}

/// Map the raw SMTP result, treating the known benign quirk as delivered
pub(crate) fn interpret_smtp_outcome(
    outcome: Result<(), String>,
    domain: &str,
) -> Result<(), SendError> {
    match outcome {
        Ok(()) => Ok(()),
        Err(message) if message.contains(BENIGN_SMTP_QUIRK) => {
            warn!(
                domain = %domain,
                "Mail accepted; ignoring '{}' from SMTP server: {}",
                BENIGN_SMTP_QUIRK,
                message
            );
            Ok(())
        }
        Err(message) => Err(SendError::Smtp(message)),
    }
}

#[async_trait]
impl NotificationSender for EmailSender {
    fn channel_type(&self) -> ChannelType {
        ChannelType::Email
    }

    async fn send(&self, record: &DomainRecord, days_remaining: i64) -> Result<(), SendError> {
        let message = self.build_message(record, days_remaining)?;
        let transport = self.build_transport()?;

        // Without connection pooling lettre drops the session after the
        // DATA reply instead of waiting on QUIT, so the quirk only shows up
        // when the server truncates the reply to the message body itself.
        let outcome = transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string());

        interpret_smtp_outcome(outcome, record.name())?;

        info!(
            domain = %record.name(),
            recipients = self.to.len(),
            "Mail notification sent"
        );
        Ok(())
    }
}
