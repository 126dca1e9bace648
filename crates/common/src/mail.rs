use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::config;

/// SendGrid v3 mail send endpoint.
const SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Errors that may occur during outbound mail delivery.
#[derive(Debug)]
pub enum MailError {
    /// Transport-level failure while reaching the mail provider.
    Http(reqwest::Error),

    /// Mail provider rejected the send request.
    Rejected(u16),
}

impl std::fmt::Display for MailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MailError::Http(err) => write!(f, "mail transport error: {err}"),
            MailError::Rejected(status) => write!(f, "mail provider rejected request: {status}"),
        }
    }
}

impl std::error::Error for MailError {}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::Http(err)
    }
}

/// Outbound mail collaborator.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single HTML mail to the provided recipient.
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError>;
}

/// [`Mailer`] implementation backed by the SendGrid HTTP API.
pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    sender: String,
}

impl SendGridMailer {
    /// Create new [`SendGridMailer`] from the provided [`Mail`] configuration.
    ///
    /// [`Mail`]: config::Mail
    pub fn new(config: &config::Mail) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.sender },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html_body }],
        });

        let response = self
            .client
            .post(SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status().as_u16()));
        }

        Ok(())
    }
}

/// [`Mailer`] implementation that drops mail on the floor.
///
/// Used when no mail configuration is present, and in tests.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, to: &str, _subject: &str, _html_body: &str) -> Result<(), MailError> {
        warn!("mail configuration is missing, dropping mail to {to}");
        Ok(())
    }
}
