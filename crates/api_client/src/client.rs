use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::types::*;

/// Every request gives up after this long, matching the mobile apps'
/// fixed client-side timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced by the REST client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP call itself failed (network, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error body.
    #[error("API error {status} ({code}): {message}")]
    Api {
        /// HTTP status of the response.
        status: u16,
        /// Machine-readable error code from the body.
        code: String,
        /// Human-readable message from the body.
        message: String,
    },

    /// A protected call was made before logging in.
    #[error("Not authenticated")]
    NotAuthenticated,
}

/// The REST surface the resource stores depend on.
///
/// Implemented by [`ApiClient`] for real traffic and by
/// [`crate::mock::MockDataProvider`] for development builds and tests.
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    /// Logs in and retains the bearer token for subsequent calls.
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError>;

    /// Registers an account and retains the bearer token.
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<AuthSession, ClientError>;

    /// Fetches the public catalog of approved experiences.
    async fn fetch_experiences(&self) -> Result<Vec<ExperienceSummary>, ClientError>;

    /// Books an experience for the logged-in traveler.
    async fn create_booking(&self, experience_id: Uuid) -> Result<BookingRecord, ClientError>;

    /// Fetches the logged-in traveler's bookings.
    async fn fetch_my_bookings(&self) -> Result<Vec<BookingSummary>, ClientError>;

    /// Fetches providers for the admin review queue.
    async fn fetch_providers(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<UserSummary>, ClientError>;

    /// Approves a provider.
    async fn approve_provider(&self, id: Uuid) -> Result<UserSummary, ClientError>;

    /// Rejects a provider.
    async fn reject_provider(&self, id: Uuid) -> Result<UserSummary, ClientError>;

    /// Fetches experiences for the admin review queue.
    async fn fetch_admin_experiences(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<ExperienceSummary>, ClientError>;

    /// Approves an experience.
    async fn approve_experience(&self, id: Uuid) -> Result<ExperienceSummary, ClientError>;

    /// Rejects an experience.
    async fn reject_experience(&self, id: Uuid) -> Result<ExperienceSummary, ClientError>;

    /// Fetches every booking for the admin overview.
    async fn fetch_admin_bookings(&self) -> Result<Vec<BookingSummary>, ClientError>;

    /// Confirms a booking.
    async fn confirm_booking(&self, id: Uuid) -> Result<BookingRecord, ClientError>;

    /// Broadcasts a push notification to every registered device.
    async fn broadcast(&self, title: &str, body: &str) -> Result<BroadcastOutcome, ClientError>;
}

/// Typed client for the Wanderlens REST API.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Creates a client for the API at `base_url` (no trailing slash).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Result<String, ClientError> {
        self.token
            .read()
            .unwrap()
            .clone()
            .ok_or(ClientError::NotAuthenticated)
    }

    fn remember_token(&self, token: &str) {
        *self.token.write().unwrap() = Some(token.to_string());
    }

    /// Sends the request and decodes the response, mapping non-2xx
    /// answers onto [`ClientError::Api`].
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.json::<ApiErrorBody>().await.unwrap_or(ApiErrorBody {
            error: "unknown_error".to_string(),
            message: status_fallback_message(status),
        });

        Err(ClientError::Api {
            status: status.as_u16(),
            code: body.error,
            message: body.message,
        })
    }

    async fn get_authed<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let bearer = self.bearer()?;
        self.send(self.http.get(self.url(path)).bearer_auth(bearer))
            .await
    }

    async fn patch_authed<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let bearer = self.bearer()?;
        self.send(self.http.patch(self.url(path)).bearer_auth(bearer))
            .await
    }
}

fn status_fallback_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[async_trait]
impl MarketplaceApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let session: AuthSession = self
            .send(
                self.http
                    .post(self.url("/api/login"))
                    .json(&serde_json::json!({ "email": email, "password": password })),
            )
            .await?;

        self.remember_token(&session.token);
        Ok(session)
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<AuthSession, ClientError> {
        let session: AuthSession = self
            .send(self.http.post(self.url("/api/register")).json(
                &serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": password,
                    "role": role
                }),
            ))
            .await?;

        self.remember_token(&session.token);
        Ok(session)
    }

    async fn fetch_experiences(&self) -> Result<Vec<ExperienceSummary>, ClientError> {
        let envelope: ExperiencesEnvelope =
            self.send(self.http.get(self.url("/api/experiences"))).await?;
        Ok(envelope.experiences)
    }

    async fn create_booking(&self, experience_id: Uuid) -> Result<BookingRecord, ClientError> {
        let bearer = self.bearer()?;
        let envelope: BookingEnvelope = self
            .send(
                self.http
                    .post(self.url("/api/bookings"))
                    .bearer_auth(bearer)
                    .json(&serde_json::json!({ "experience_id": experience_id })),
            )
            .await?;
        Ok(envelope.booking)
    }

    async fn fetch_my_bookings(&self) -> Result<Vec<BookingSummary>, ClientError> {
        let envelope: BookingsEnvelope = self.get_authed("/api/bookings/mine").await?;
        Ok(envelope.bookings)
    }

    async fn fetch_providers(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<UserSummary>, ClientError> {
        let path = match status {
            Some(status) => format!("/api/admin/providers?status={}", status),
            None => "/api/admin/providers".to_string(),
        };

        let envelope: ProvidersEnvelope = self.get_authed(&path).await?;
        Ok(envelope.providers)
    }

    async fn approve_provider(&self, id: Uuid) -> Result<UserSummary, ClientError> {
        let envelope: ProviderEnvelope = self
            .patch_authed(&format!("/api/admin/providers/{}/approve", id))
            .await?;
        Ok(envelope.provider)
    }

    async fn reject_provider(&self, id: Uuid) -> Result<UserSummary, ClientError> {
        let envelope: ProviderEnvelope = self
            .patch_authed(&format!("/api/admin/providers/{}/reject", id))
            .await?;
        Ok(envelope.provider)
    }

    async fn fetch_admin_experiences(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<ExperienceSummary>, ClientError> {
        let path = match status {
            Some(status) => format!("/api/admin/experiences?status={}", status),
            None => "/api/admin/experiences".to_string(),
        };

        let envelope: ExperiencesEnvelope = self.get_authed(&path).await?;
        Ok(envelope.experiences)
    }

    async fn approve_experience(&self, id: Uuid) -> Result<ExperienceSummary, ClientError> {
        let envelope: ExperienceEnvelope = self
            .patch_authed(&format!("/api/admin/experiences/{}/approve", id))
            .await?;
        Ok(envelope.experience)
    }

    async fn reject_experience(&self, id: Uuid) -> Result<ExperienceSummary, ClientError> {
        let envelope: ExperienceEnvelope = self
            .patch_authed(&format!("/api/admin/experiences/{}/reject", id))
            .await?;
        Ok(envelope.experience)
    }

    async fn fetch_admin_bookings(&self) -> Result<Vec<BookingSummary>, ClientError> {
        let envelope: BookingsEnvelope = self.get_authed("/api/admin/bookings").await?;
        Ok(envelope.bookings)
    }

    async fn confirm_booking(&self, id: Uuid) -> Result<BookingRecord, ClientError> {
        let envelope: BookingEnvelope = self
            .patch_authed(&format!("/api/bookings/{}/confirm", id))
            .await?;
        Ok(envelope.booking)
    }

    async fn broadcast(&self, title: &str, body: &str) -> Result<BroadcastOutcome, ClientError> {
        let bearer = self.bearer()?;
        self.send(
            self.http
                .post(self.url("/api/admin/notifications"))
                .bearer_auth(bearer)
                .json(&serde_json::json!({ "title": title, "body": body })),
        )
        .await
    }
}
