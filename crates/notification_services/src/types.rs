use serde::Serialize;

/// Errors from the notification transports.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Push delivery failed or the push API rejected the message.
    #[error("Push error: {0}")]
    Push(String),

    /// Email delivery failed or the email API rejected the message.
    #[error("Email error: {0}")]
    Email(String),

    /// The outbound HTTP call itself failed.
    #[error("Transport error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A push message addressed to a single device token.
#[derive(Debug, Clone, Serialize)]
pub struct PushMessage {
    /// Expo push token of the target device.
    pub to: String,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
}
