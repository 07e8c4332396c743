use std::sync::Arc;

use tracing::{debug, error, info};

use crate::email::EmailService;
use crate::push::PushService;
use crate::types::{NotificationError, PushMessage};

/// Dispatch hooks for marketplace lifecycle events.
///
/// Each hook is best-effort: the booking or reset it follows has already
/// been persisted, so callers log a delivery failure and carry on rather
/// than failing the request.
pub struct Notifier {
    push: Arc<dyn PushService>,
    email: Arc<dyn EmailService>,
}

impl Notifier {
    /// Creates a notifier over the given transports.
    pub fn new(push: Arc<dyn PushService>, email: Arc<dyn EmailService>) -> Self {
        Self { push, email }
    }

    /// Tells a provider that a traveler booked one of their experiences.
    /// Skips silently when the provider never registered a device.
    pub async fn booking_created(
        &self,
        provider_push_token: Option<&str>,
        experience_title: &str,
    ) -> Result<(), NotificationError> {
        let Some(token) = provider_push_token else {
            debug!("Provider has no push token, skipping booking notification");
            return Ok(());
        };

        let message = PushMessage {
            to: token.to_string(),
            title: "New booking request".to_string(),
            body: format!("A traveler just booked \"{}\"", experience_title),
        };

        self.push.send_push(&message).await?;
        info!("Booking-created push sent for \"{}\"", experience_title);
        Ok(())
    }

    /// Tells a traveler that their booking was confirmed.
    /// Skips silently when the traveler never registered a device.
    pub async fn booking_confirmed(
        &self,
        traveler_push_token: Option<&str>,
        experience_title: &str,
    ) -> Result<(), NotificationError> {
        let Some(token) = traveler_push_token else {
            debug!("Traveler has no push token, skipping confirmation notification");
            return Ok(());
        };

        let message = PushMessage {
            to: token.to_string(),
            title: "Booking confirmed".to_string(),
            body: format!("Your booking for \"{}\" is confirmed", experience_title),
        };

        self.push.send_push(&message).await?;
        info!("Booking-confirmed push sent for \"{}\"", experience_title);
        Ok(())
    }

    /// Broadcasts an admin announcement to every registered device token.
    /// Failures are logged per token; returns how many deliveries succeeded.
    pub async fn broadcast(&self, tokens: &[String], title: &str, body: &str) -> usize {
        let mut delivered = 0;

        for token in tokens {
            let message = PushMessage {
                to: token.clone(),
                title: title.to_string(),
                body: body.to_string(),
            };

            match self.push.send_push(&message).await {
                Ok(_) => delivered += 1,
                Err(e) => error!("Broadcast to {} failed: {}", token, e),
            }
        }

        info!("Broadcast delivered to {}/{} devices", delivered, tokens.len());
        delivered
    }

    /// Emails a password-reset token to the account holder.
    pub async fn password_reset_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
    ) -> Result<(), NotificationError> {
        let subject = "Reset your Wanderlens password";
        let body = format!(
            "Hi {}!\n\nUse this token to reset your Wanderlens password:\n\n{}\n\n\
             The token expires in 60 minutes. If you didn't request a reset, \
             you can safely ignore this email.",
            name, token
        );

        self.email.send_email(to, subject, &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::MockEmailService;
    use crate::push::MockPushService;
    use async_trait::async_trait;

    struct FailingPushService;

    #[async_trait]
    impl PushService for FailingPushService {
        async fn send_push(&self, _message: &PushMessage) -> Result<String, NotificationError> {
            Err(NotificationError::Push("device unreachable".to_string()))
        }
    }

    fn notifier_with(push: Arc<dyn PushService>) -> Notifier {
        Notifier::new(push, Arc::new(MockEmailService))
    }

    #[tokio::test]
    async fn confirmation_dispatches_exactly_one_push() {
        let push = Arc::new(MockPushService::new());
        let notifier = notifier_with(push.clone());

        notifier
            .booking_confirmed(Some("ExponentPushToken[abc]"), "Old Town AR Walk")
            .await
            .unwrap();

        assert_eq!(push.sent_count(), 1);
        let sent = push.sent.lock().unwrap();
        assert_eq!(sent[0].to, "ExponentPushToken[abc]");
        assert!(sent[0].body.contains("Old Town AR Walk"));
    }

    #[tokio::test]
    async fn missing_token_skips_dispatch_without_error() {
        let push = Arc::new(MockPushService::new());
        let notifier = notifier_with(push.clone());

        notifier
            .booking_created(None, "Rainforest Eco Tour")
            .await
            .unwrap();

        assert_eq!(push.sent_count(), 0);
    }

    #[tokio::test]
    async fn broadcast_counts_only_successful_deliveries() {
        let push = Arc::new(MockPushService::new());
        let notifier = notifier_with(push.clone());

        let tokens = vec!["t1".to_string(), "t2".to_string(), "t3".to_string()];
        let delivered = notifier.broadcast(&tokens, "Maintenance", "Back at noon").await;

        assert_eq!(delivered, 3);
        assert_eq!(push.sent_count(), 3);
    }

    #[tokio::test]
    async fn broadcast_survives_transport_failures() {
        let notifier = notifier_with(Arc::new(FailingPushService));

        let tokens = vec!["t1".to_string(), "t2".to_string()];
        let delivered = notifier.broadcast(&tokens, "Hello", "World").await;

        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn failed_confirmation_push_reports_the_error() {
        let notifier = notifier_with(Arc::new(FailingPushService));

        let result = notifier
            .booking_confirmed(Some("ExponentPushToken[abc]"), "Heritage Palace Tour")
            .await;

        assert!(result.is_err());
    }
}
