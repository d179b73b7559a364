mod dingtalk;
mod email;
mod message_builder;
mod sender_factory;
mod telegram;
mod webhook;

pub use dingtalk::DingTalkSender;
pub use email::{EmailSender, SmtpSettings};
pub use sender_factory::{build_senders, create_sender};
pub use telegram::TelegramSender;
pub use webhook::WebhookSender;

use reqwest::{Client, Response};
use std::time::Duration;

use domwatch_domain::notification::SendError;

/// Plain HTTP client for a channel. Ambient proxy variables are ignored;
/// a proxy only ever comes from explicit channel configuration.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, SendError> {
    Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()
        .map_err(|e| SendError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Turn a non-2xx response into `SendError::HttpStatus`, keeping the body for diagnostics
pub(crate) async fn ensure_success(response: Response) -> Result<Response, SendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(SendError::HttpStatus {
        status: status.as_u16(),
        body,
    })
}
