use std::env;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::types::{NotificationError, PushMessage};

/// Trait for push delivery implementations.
#[async_trait]
pub trait PushService: Send + Sync {
    /// Delivers one message, returning the transport's receipt id.
    async fn send_push(&self, message: &PushMessage) -> Result<String, NotificationError>;
}

/// Push service backed by the Expo push HTTP API.
pub struct ExpoPushService {
    client: Client,
    endpoint: String,
}

impl ExpoPushService {
    /// Creates the service, honoring `EXPO_PUSH_URL` for test setups.
    pub fn new() -> Self {
        let endpoint = env::var("EXPO_PUSH_URL")
            .unwrap_or_else(|_| "https://exp.host/--/api/v2/push/send".to_string());

        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl PushService for ExpoPushService {
    async fn send_push(&self, message: &PushMessage) -> Result<String, NotificationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotificationError::Push(format!(
                "Expo push API returned {}",
                response.status()
            )));
        }

        // Expo answers {"data": {"status": "ok"|"error", "id": ..., "message": ...}}
        let body: Value = response.json().await?;
        let ticket = &body["data"];

        if ticket["status"] == "error" {
            let reason = ticket["message"].as_str().unwrap_or("unknown error");
            return Err(NotificationError::Push(reason.to_string()));
        }

        let receipt = ticket["id"].as_str().unwrap_or("ok").to_string();

        info!("Push delivered to {}, receipt {}", message.to, receipt);
        Ok(receipt)
    }
}

/// Mock push service for development/testing. Records every message so
/// tests can assert on what was dispatched.
pub struct MockPushService {
    /// Messages handed to the service, in dispatch order.
    pub sent: Mutex<Vec<PushMessage>>,
}

impl MockPushService {
    /// Creates an empty recording mock.
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Number of messages dispatched so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl PushService for MockPushService {
    async fn send_push(&self, message: &PushMessage) -> Result<String, NotificationError> {
        info!("📱 [MOCK PUSH] To: {}", message.to);
        info!("📱 [MOCK PUSH] {}: {}", message.title, message.body);

        self.sent.lock().unwrap().push(message.clone());
        Ok(format!("mock-push-{}", uuid::Uuid::new_v4()))
    }
}
