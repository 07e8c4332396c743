use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::types::NotificationError;

/// Trait for email delivery implementations.
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Delivers one message, returning the transport's receipt id.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError>;
}

#[derive(Debug, Serialize)]
struct EmailApiRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Email service posting to an HTTP email API (Resend-style).
pub struct HttpEmailService {
    client: Client,
    endpoint: String,
    api_key: String,
    from_email: String,
}

impl HttpEmailService {
    /// Builds the service from `EMAIL_API_URL`, `EMAIL_API_KEY`, and
    /// `FROM_EMAIL`.
    pub fn new() -> Result<Self, NotificationError> {
        let endpoint = env::var("EMAIL_API_URL")
            .unwrap_or_else(|_| "https://api.resend.com/emails".to_string());

        let api_key = env::var("EMAIL_API_KEY").map_err(|_| {
            NotificationError::Email("EMAIL_API_KEY environment variable not set".to_string())
        })?;

        let from_email =
            env::var("FROM_EMAIL").unwrap_or_else(|_| "noreply@wanderlens.app".to_string());

        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key,
            from_email,
        })
    }
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError> {
        info!("Sending email to {} with subject: {}", to, subject);

        let request = EmailApiRequest {
            from: &self.from_email,
            to,
            subject,
            text: body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotificationError::Email(format!(
                "Email API returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        let receipt = body["id"].as_str().unwrap_or("ok").to_string();

        Ok(receipt)
    }
}

/// Mock email service for development/testing.
pub struct MockEmailService;

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<String, NotificationError> {
        info!("📧 [MOCK EMAIL] To: {}", to);
        info!("📧 [MOCK EMAIL] Subject: {}", subject);
        info!("📧 [MOCK EMAIL] Body:\n{}", body);

        let mock_id = format!("mock-email-{}", uuid::Uuid::new_v4());
        Ok(mock_id)
    }
}
