use std::sync::Arc;

use uuid::Uuid;

use crate::client::{ClientError, MarketplaceApi};
use crate::types::*;

/// Whether a store message should render as a success or failure toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// The action completed.
    Success,
    /// The action failed; the store state was left as it was.
    Error,
}

/// A one-shot message for the UI's toast layer.
#[derive(Debug, Clone)]
pub struct StoreMessage {
    /// Success or error.
    pub kind: MessageKind,
    /// Text to display.
    pub text: String,
}

impl StoreMessage {
    fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    fn error(error: &ClientError) -> Self {
        Self {
            kind: MessageKind::Error,
            text: error.to_string(),
        }
    }
}

/// Session state store backing the login/registration screens.
///
/// The data source is injected so each app session (and each test) owns
/// an isolated instance; nothing here is global.
pub struct AuthStore {
    api: Arc<dyn MarketplaceApi>,
    /// The logged-in session, if any.
    pub session: Option<AuthSession>,
    /// True while a request is in flight.
    pub loading: bool,
    /// Outcome of the last action, for the toast layer.
    pub last_message: Option<StoreMessage>,
}

impl AuthStore {
    /// Creates a store over the given data source.
    pub fn new(api: Arc<dyn MarketplaceApi>) -> Self {
        Self {
            api,
            session: None,
            loading: false,
            last_message: None,
        }
    }

    /// Logs in and keeps the session on success.
    pub async fn login(&mut self, email: &str, password: &str) {
        self.loading = true;

        match self.api.login(email, password).await {
            Ok(session) => {
                self.last_message =
                    Some(StoreMessage::success(format!("Welcome back, {}", session.user.name)));
                self.session = Some(session);
            }
            Err(e) => {
                self.last_message = Some(StoreMessage::error(&e));
            }
        }

        self.loading = false;
    }

    /// Registers an account and keeps the session on success.
    pub async fn register(&mut self, name: &str, email: &str, password: &str, role: &str) {
        self.loading = true;

        match self.api.register(name, email, password, role).await {
            Ok(session) => {
                self.last_message = Some(StoreMessage::success("Account created"));
                self.session = Some(session);
            }
            Err(e) => {
                self.last_message = Some(StoreMessage::error(&e));
            }
        }

        self.loading = false;
    }

    /// Drops the local session.
    pub fn logout(&mut self) {
        self.session = None;
        self.last_message = None;
    }
}

/// Catalog and booking store backing the traveler screens.
pub struct ExperienceStore {
    api: Arc<dyn MarketplaceApi>,
    /// The approved experiences last fetched.
    pub experiences: Vec<ExperienceSummary>,
    /// The traveler's own bookings last fetched.
    pub bookings: Vec<BookingSummary>,
    /// True while a request is in flight.
    pub loading: bool,
    /// Outcome of the last action, for the toast layer.
    pub last_message: Option<StoreMessage>,
}

impl ExperienceStore {
    /// Creates a store over the given data source.
    pub fn new(api: Arc<dyn MarketplaceApi>) -> Self {
        Self {
            api,
            experiences: Vec::new(),
            bookings: Vec::new(),
            loading: false,
            last_message: None,
        }
    }

    /// Replaces the catalog with the latest approved experiences.
    pub async fn fetch_experiences(&mut self) {
        self.loading = true;

        match self.api.fetch_experiences().await {
            Ok(experiences) => self.experiences = experiences,
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    /// Books an experience and refreshes nothing else; the new booking is
    /// appended locally from the response.
    pub async fn book(&mut self, experience_id: Uuid) {
        self.loading = true;

        match self.api.create_booking(experience_id).await {
            Ok(booking) => {
                let title = self
                    .experiences
                    .iter()
                    .find(|e| e.id == experience_id)
                    .map(|e| e.title.clone())
                    .unwrap_or_else(|| "experience".to_string());
                let location = self
                    .experiences
                    .iter()
                    .find(|e| e.id == experience_id)
                    .map(|e| e.location.clone())
                    .unwrap_or_default();

                self.bookings.push(BookingSummary {
                    id: booking.id,
                    experience_id: booking.experience_id,
                    experience_title: title.clone(),
                    location,
                    traveler_id: booking.traveler_id,
                    status: booking.status,
                    created_at: booking.created_at,
                });
                self.last_message = Some(StoreMessage::success(format!("Booked {}", title)));
            }
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    /// Replaces the booking list with the traveler's latest bookings.
    pub async fn fetch_my_bookings(&mut self) {
        self.loading = true;

        match self.api.fetch_my_bookings().await {
            Ok(bookings) => self.bookings = bookings,
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }
}

/// Review-queue store backing the admin screens.
pub struct AdminStore {
    api: Arc<dyn MarketplaceApi>,
    /// Providers last fetched.
    pub providers: Vec<UserSummary>,
    /// Experiences last fetched.
    pub experiences: Vec<ExperienceSummary>,
    /// Bookings last fetched.
    pub bookings: Vec<BookingSummary>,
    /// True while a request is in flight.
    pub loading: bool,
    /// Outcome of the last action, for the toast layer.
    pub last_message: Option<StoreMessage>,
}

impl AdminStore {
    /// Creates a store over the given data source.
    pub fn new(api: Arc<dyn MarketplaceApi>) -> Self {
        Self {
            api,
            providers: Vec::new(),
            experiences: Vec::new(),
            bookings: Vec::new(),
            loading: false,
            last_message: None,
        }
    }

    /// Replaces the provider queue, optionally filtered by status.
    pub async fn fetch_providers(&mut self, status: Option<&str>) {
        self.loading = true;

        match self.api.fetch_providers(status).await {
            Ok(providers) => self.providers = providers,
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    /// Approves a provider and patches the local list entry.
    pub async fn approve_provider(&mut self, id: Uuid) {
        self.loading = true;

        match self.api.approve_provider(id).await {
            Ok(updated) => {
                self.patch_provider(updated);
                self.last_message = Some(StoreMessage::success("Provider approved"));
            }
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    /// Rejects a provider and patches the local list entry.
    pub async fn reject_provider(&mut self, id: Uuid) {
        self.loading = true;

        match self.api.reject_provider(id).await {
            Ok(updated) => {
                self.patch_provider(updated);
                self.last_message = Some(StoreMessage::success("Provider rejected"));
            }
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    /// Replaces the experience queue, optionally filtered by status.
    pub async fn fetch_experiences(&mut self, status: Option<&str>) {
        self.loading = true;

        match self.api.fetch_admin_experiences(status).await {
            Ok(experiences) => self.experiences = experiences,
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    /// Approves an experience and patches the local list entry.
    pub async fn approve_experience(&mut self, id: Uuid) {
        self.loading = true;

        match self.api.approve_experience(id).await {
            Ok(updated) => {
                self.patch_experience(updated);
                self.last_message = Some(StoreMessage::success("Experience approved"));
            }
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    /// Rejects an experience and patches the local list entry.
    pub async fn reject_experience(&mut self, id: Uuid) {
        self.loading = true;

        match self.api.reject_experience(id).await {
            Ok(updated) => {
                self.patch_experience(updated);
                self.last_message = Some(StoreMessage::success("Experience rejected"));
            }
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    /// Replaces the booking overview.
    pub async fn fetch_bookings(&mut self) {
        self.loading = true;

        match self.api.fetch_admin_bookings().await {
            Ok(bookings) => self.bookings = bookings,
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    /// Confirms a booking and patches the local list entry.
    pub async fn confirm_booking(&mut self, id: Uuid) {
        self.loading = true;

        match self.api.confirm_booking(id).await {
            Ok(updated) => {
                if let Some(entry) = self.bookings.iter_mut().find(|b| b.id == updated.id) {
                    entry.status = updated.status;
                }
                self.last_message = Some(StoreMessage::success("Booking confirmed"));
            }
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    /// Broadcasts an announcement to every registered device.
    pub async fn broadcast(&mut self, title: &str, body: &str) {
        self.loading = true;

        match self.api.broadcast(title, body).await {
            Ok(outcome) => {
                self.last_message = Some(StoreMessage::success(format!(
                    "Delivered to {}/{} devices",
                    outcome.delivered, outcome.requested
                )));
            }
            Err(e) => self.last_message = Some(StoreMessage::error(&e)),
        }

        self.loading = false;
    }

    fn patch_provider(&mut self, updated: UserSummary) {
        if let Some(entry) = self.providers.iter_mut().find(|p| p.id == updated.id) {
            *entry = updated;
        }
    }

    fn patch_experience(&mut self, updated: ExperienceSummary) {
        if let Some(entry) = self.experiences.iter_mut().find(|e| e.id == updated.id) {
            *entry = updated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDataProvider;
    use async_trait::async_trait;

    /// Data source whose every call fails, for exercising the error paths.
    struct UnreachableApi;

    #[async_trait]
    impl MarketplaceApi for UnreachableApi {
        async fn login(&self, _: &str, _: &str) -> Result<AuthSession, ClientError> {
            Err(self.down())
        }
        async fn register(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: &str,
        ) -> Result<AuthSession, ClientError> {
            Err(self.down())
        }
        async fn fetch_experiences(&self) -> Result<Vec<ExperienceSummary>, ClientError> {
            Err(self.down())
        }
        async fn create_booking(&self, _: Uuid) -> Result<BookingRecord, ClientError> {
            Err(self.down())
        }
        async fn fetch_my_bookings(&self) -> Result<Vec<BookingSummary>, ClientError> {
            Err(self.down())
        }
        async fn fetch_providers(
            &self,
            _: Option<&str>,
        ) -> Result<Vec<UserSummary>, ClientError> {
            Err(self.down())
        }
        async fn approve_provider(&self, _: Uuid) -> Result<UserSummary, ClientError> {
            Err(self.down())
        }
        async fn reject_provider(&self, _: Uuid) -> Result<UserSummary, ClientError> {
            Err(self.down())
        }
        async fn fetch_admin_experiences(
            &self,
            _: Option<&str>,
        ) -> Result<Vec<ExperienceSummary>, ClientError> {
            Err(self.down())
        }
        async fn approve_experience(&self, _: Uuid) -> Result<ExperienceSummary, ClientError> {
            Err(self.down())
        }
        async fn reject_experience(&self, _: Uuid) -> Result<ExperienceSummary, ClientError> {
            Err(self.down())
        }
        async fn fetch_admin_bookings(&self) -> Result<Vec<BookingSummary>, ClientError> {
            Err(self.down())
        }
        async fn confirm_booking(&self, _: Uuid) -> Result<BookingRecord, ClientError> {
            Err(self.down())
        }
        async fn broadcast(&self, _: &str, _: &str) -> Result<BroadcastOutcome, ClientError> {
            Err(self.down())
        }
    }

    impl UnreachableApi {
        fn down(&self) -> ClientError {
            ClientError::Api {
                status: 503,
                code: "unavailable".to_string(),
                message: "Service unavailable".to_string(),
            }
        }
    }

    #[tokio::test]
    async fn fetch_providers_populates_the_queue() {
        let mut store = AdminStore::new(Arc::new(MockDataProvider::new()));

        store.fetch_providers(None).await;

        assert!(!store.loading);
        assert_eq!(store.providers.len(), 2);
        assert!(store.providers.iter().all(|p| p.role == "provider"));
    }

    #[tokio::test]
    async fn status_filter_narrows_the_queue() {
        let mut store = AdminStore::new(Arc::new(MockDataProvider::new()));

        store.fetch_providers(Some("pending")).await;

        assert_eq!(store.providers.len(), 1);
        assert_eq!(store.providers[0].status, "pending");
    }

    #[tokio::test]
    async fn approving_a_provider_patches_the_local_entry() {
        let mut store = AdminStore::new(Arc::new(MockDataProvider::new()));

        store.fetch_providers(None).await;
        let pending = store
            .providers
            .iter()
            .find(|p| p.status == "pending")
            .unwrap()
            .id;

        store.approve_provider(pending).await;

        let entry = store.providers.iter().find(|p| p.id == pending).unwrap();
        assert_eq!(entry.status, "approved");
        assert_eq!(
            store.last_message.as_ref().unwrap().kind,
            MessageKind::Success
        );
    }

    #[tokio::test]
    async fn failed_fetch_keeps_state_and_surfaces_an_error_toast() {
        let mut store = AdminStore::new(Arc::new(UnreachableApi));

        store.fetch_providers(None).await;

        assert!(store.providers.is_empty());
        assert!(!store.loading);
        assert_eq!(
            store.last_message.as_ref().unwrap().kind,
            MessageKind::Error
        );
    }

    #[tokio::test]
    async fn traveler_store_books_and_mirrors_the_result() {
        let api = Arc::new(MockDataProvider::new());
        let mut store = ExperienceStore::new(api);

        store.fetch_experiences().await;
        assert_eq!(store.experiences.len(), 2); // only approved listings

        let target = store.experiences[0].id;
        store.book(target).await;

        assert_eq!(store.bookings.len(), 1);
        assert_eq!(store.bookings[0].experience_id, target);
        assert_eq!(store.bookings[0].status, "pending");
    }

    #[tokio::test]
    async fn auth_store_keeps_session_after_login() {
        let mut store = AuthStore::new(Arc::new(MockDataProvider::new()));

        store.login("sam@walker.example", "whatever").await;

        let session = store.session.as_ref().unwrap();
        assert_eq!(session.user.role, "traveler");

        store.logout();
        assert!(store.session.is_none());
    }

    #[tokio::test]
    async fn auth_store_surfaces_login_failure() {
        let mut store = AuthStore::new(Arc::new(MockDataProvider::new()));

        store.login("nobody@nowhere.example", "whatever").await;

        assert!(store.session.is_none());
        assert_eq!(
            store.last_message.as_ref().unwrap().kind,
            MessageKind::Error
        );
    }

    #[tokio::test]
    async fn confirming_a_booking_flips_the_listed_status() {
        let mut store = AdminStore::new(Arc::new(MockDataProvider::new()));

        store.fetch_bookings().await;
        let id = store.bookings[0].id;

        store.confirm_booking(id).await;

        assert_eq!(store.bookings[0].status, "confirmed");
    }
}
