//! Minimal client for the transactional mail provider.

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.resend.com";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail provider rejected the message (status {status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Serialize)]
pub struct Attachment {
    pub filename: String,
    /// Base64 of the file bytes, as the provider expects.
    pub content: String,
}

/// Serializes straight into the provider's send-email body.
#[derive(Debug, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

pub struct MailClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl MailClient {
    pub fn new(http: reqwest::Client, api_key: String, base_url: String) -> Self {
        MailClient {
            http,
            api_key,
            base_url,
        }
    }

    /// Sends one email, treating any non-2xx reply as a rejection.
    pub async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let url = format!("{}/emails", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        log::info!("mail provider accepted {:?}", email.subject);
        Ok(())
    }
}
