use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::client::{ClientError, MarketplaceApi};
use crate::types::*;

/// Canned data source for development builds and store tests.
///
/// This is the explicit home of the sample payloads the legacy apps used
/// to fall back to on network failure. A build that wants populated
/// screens without a backend must construct the stores with this
/// provider; the live [`crate::client::ApiClient`] never substitutes it.
pub struct MockDataProvider {
    state: Mutex<MockState>,
}

struct MockState {
    users: Vec<UserSummary>,
    experiences: Vec<ExperienceSummary>,
    bookings: Vec<BookingSummary>,
}

impl MockDataProvider {
    /// Creates the provider with its built-in sample marketplace.
    pub fn new() -> Self {
        let provider_id = Uuid::new_v4();
        let pending_provider_id = Uuid::new_v4();
        let traveler_id = Uuid::new_v4();
        let now = Utc::now();

        let users = vec![
            UserSummary {
                id: provider_id,
                name: "Aria Tours".to_string(),
                email: "hello@ariatours.example".to_string(),
                phone: None,
                role: "provider".to_string(),
                interests: vec![],
                status: "approved".to_string(),
                created_at: now,
            },
            UserSummary {
                id: pending_provider_id,
                name: "Valley Guides".to_string(),
                email: "team@valleyguides.example".to_string(),
                phone: Some("+15550100".to_string()),
                role: "provider".to_string(),
                interests: vec![],
                status: "pending".to_string(),
                created_at: now,
            },
            UserSummary {
                id: traveler_id,
                name: "Sam Walker".to_string(),
                email: "sam@walker.example".to_string(),
                phone: None,
                role: "traveler".to_string(),
                interests: vec!["heritage".to_string(), "AR_site".to_string()],
                status: "approved".to_string(),
                created_at: now,
            },
        ];

        let ar_walk_id = Uuid::new_v4();
        let experiences = vec![
            ExperienceSummary {
                id: ar_walk_id,
                title: "Old Town AR Walk".to_string(),
                description: "See the medieval town rise around you".to_string(),
                image: "uploads/old-town.jpg".to_string(),
                price: Some(25.0),
                category: "AR_site".to_string(),
                location: "Porto".to_string(),
                rating: 4.6,
                provider_id,
                status: "approved".to_string(),
                created_at: now,
            },
            ExperienceSummary {
                id: Uuid::new_v4(),
                title: "Rainforest Canopy Tour".to_string(),
                description: "Guided walk along the canopy bridges".to_string(),
                image: "uploads/canopy.jpg".to_string(),
                price: Some(40.0),
                category: "eco_tour".to_string(),
                location: "Monteverde".to_string(),
                rating: 4.8,
                provider_id,
                status: "approved".to_string(),
                created_at: now,
            },
            ExperienceSummary {
                id: Uuid::new_v4(),
                title: "Weavers' Quarter Visit".to_string(),
                description: "Meet the last hand-loom workshop in town".to_string(),
                image: "uploads/weavers.jpg".to_string(),
                price: None,
                category: "heritage".to_string(),
                location: "Oaxaca".to_string(),
                rating: 4.2,
                provider_id: pending_provider_id,
                status: "pending".to_string(),
                created_at: now,
            },
        ];

        let bookings = vec![BookingSummary {
            id: Uuid::new_v4(),
            experience_id: ar_walk_id,
            experience_title: "Old Town AR Walk".to_string(),
            location: "Porto".to_string(),
            traveler_id,
            status: "pending".to_string(),
            created_at: now,
        }];

        Self {
            state: Mutex::new(MockState {
                users,
                experiences,
                bookings,
            }),
        }
    }

    fn session_for(user: &UserSummary) -> AuthSession {
        AuthSession {
            token: format!("mock-token-{}", user.id),
            user: user.clone(),
        }
    }
}

#[async_trait]
impl MarketplaceApi for MockDataProvider {
    async fn login(&self, email: &str, _password: &str) -> Result<AuthSession, ClientError> {
        let state = self.state.lock().unwrap();

        state
            .users
            .iter()
            .find(|user| user.email == email)
            .map(Self::session_for)
            .ok_or(ClientError::Api {
                status: 401,
                code: "invalid_credentials".to_string(),
                message: "Invalid email or password".to_string(),
            })
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        _password: &str,
        role: &str,
    ) -> Result<AuthSession, ClientError> {
        let mut state = self.state.lock().unwrap();

        let status = if role == "provider" { "pending" } else { "approved" };
        let user = UserSummary {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            role: role.to_string(),
            interests: vec![],
            status: status.to_string(),
            created_at: Utc::now(),
        };

        state.users.push(user.clone());
        Ok(Self::session_for(&user))
    }

    async fn fetch_experiences(&self) -> Result<Vec<ExperienceSummary>, ClientError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .experiences
            .iter()
            .filter(|e| e.status == "approved")
            .cloned()
            .collect())
    }

    async fn create_booking(&self, experience_id: Uuid) -> Result<BookingRecord, ClientError> {
        let mut state = self.state.lock().unwrap();

        let experience = state
            .experiences
            .iter()
            .find(|e| e.id == experience_id)
            .cloned()
            .ok_or(ClientError::Api {
                status: 404,
                code: "experience_not_found".to_string(),
                message: "Experience not found".to_string(),
            })?;

        if experience.status != "approved" {
            return Err(ClientError::Api {
                status: 400,
                code: "experience_not_bookable".to_string(),
                message: "This experience is not open for booking".to_string(),
            });
        }

        let traveler_id = state
            .users
            .iter()
            .find(|u| u.role == "traveler")
            .map(|u| u.id)
            .unwrap_or_else(Uuid::new_v4);

        let booking = BookingSummary {
            id: Uuid::new_v4(),
            experience_id,
            experience_title: experience.title.clone(),
            location: experience.location.clone(),
            traveler_id,
            status: "pending".to_string(),
            created_at: Utc::now(),
        };

        state.bookings.push(booking.clone());

        Ok(BookingRecord {
            id: booking.id,
            experience_id,
            traveler_id,
            status: booking.status,
            created_at: booking.created_at,
        })
    }

    async fn fetch_my_bookings(&self) -> Result<Vec<BookingSummary>, ClientError> {
        let state = self.state.lock().unwrap();
        Ok(state.bookings.clone())
    }

    async fn fetch_providers(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<UserSummary>, ClientError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|u| u.role == "provider")
            .filter(|u| status.is_none_or(|s| u.status == s))
            .cloned()
            .collect())
    }

    async fn approve_provider(&self, id: Uuid) -> Result<UserSummary, ClientError> {
        self.set_user_status(id, "approved")
    }

    async fn reject_provider(&self, id: Uuid) -> Result<UserSummary, ClientError> {
        self.set_user_status(id, "rejected")
    }

    async fn fetch_admin_experiences(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<ExperienceSummary>, ClientError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .experiences
            .iter()
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect())
    }

    async fn approve_experience(&self, id: Uuid) -> Result<ExperienceSummary, ClientError> {
        self.set_experience_status(id, "approved")
    }

    async fn reject_experience(&self, id: Uuid) -> Result<ExperienceSummary, ClientError> {
        self.set_experience_status(id, "rejected")
    }

    async fn fetch_admin_bookings(&self) -> Result<Vec<BookingSummary>, ClientError> {
        let state = self.state.lock().unwrap();
        Ok(state.bookings.clone())
    }

    async fn confirm_booking(&self, id: Uuid) -> Result<BookingRecord, ClientError> {
        let mut state = self.state.lock().unwrap();

        let booking = state
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(ClientError::Api {
                status: 404,
                code: "booking_not_found".to_string(),
                message: "Booking not found".to_string(),
            })?;

        booking.status = "confirmed".to_string();

        Ok(BookingRecord {
            id: booking.id,
            experience_id: booking.experience_id,
            traveler_id: booking.traveler_id,
            status: booking.status.clone(),
            created_at: booking.created_at,
        })
    }

    async fn broadcast(&self, _title: &str, _body: &str) -> Result<BroadcastOutcome, ClientError> {
        let state = self.state.lock().unwrap();
        let requested = state.users.len();

        Ok(BroadcastOutcome {
            requested,
            delivered: requested,
        })
    }
}

impl MockDataProvider {
    fn set_user_status(&self, id: Uuid, status: &str) -> Result<UserSummary, ClientError> {
        let mut state = self.state.lock().unwrap();

        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ClientError::Api {
                status: 404,
                code: "user_not_found".to_string(),
                message: "User not found".to_string(),
            })?;

        user.status = status.to_string();
        Ok(user.clone())
    }

    fn set_experience_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<ExperienceSummary, ClientError> {
        let mut state = self.state.lock().unwrap();

        let experience = state
            .experiences
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ClientError::Api {
                status: 404,
                code: "experience_not_found".to_string(),
                message: "Experience not found".to_string(),
            })?;

        experience.status = status.to_string();
        Ok(experience.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn pending_provider_id(api: &MockDataProvider) -> Uuid {
        api.fetch_providers(Some("pending"))
            .await
            .unwrap()
            .first()
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn approve_then_reject_lands_on_the_last_target() {
        let api = MockDataProvider::new();
        let id = pending_provider_id(&api).await;

        let approved = api.approve_provider(id).await.unwrap();
        assert_eq!(approved.status, "approved");

        // No guard requires the current status to be pending; the last
        // admin action wins.
        let rejected = api.reject_provider(id).await.unwrap();
        assert_eq!(rejected.status, "rejected");
    }

    #[tokio::test]
    async fn double_approve_succeeds_both_times() {
        let api = MockDataProvider::new();
        let id = pending_provider_id(&api).await;

        let first = api.approve_provider(id).await.unwrap();
        let second = api.approve_provider(id).await.unwrap();

        assert_eq!(first.status, "approved");
        assert_eq!(second.status, "approved");
    }

    #[tokio::test]
    async fn booking_a_pending_experience_fails_and_creates_nothing() {
        let api = MockDataProvider::new();

        let pending = api
            .fetch_admin_experiences(Some("pending"))
            .await
            .unwrap()
            .first()
            .unwrap()
            .id;
        let before = api.fetch_admin_bookings().await.unwrap().len();

        let result = api.create_booking(pending).await;

        assert!(matches!(result, Err(ClientError::Api { status: 400, .. })));
        assert_eq!(api.fetch_admin_bookings().await.unwrap().len(), before);
    }

    #[tokio::test]
    async fn confirming_a_nonexistent_booking_is_not_found() {
        let api = MockDataProvider::new();

        let result = api.confirm_booking(Uuid::new_v4()).await;

        assert!(matches!(result, Err(ClientError::Api { status: 404, .. })));
    }

    #[tokio::test]
    async fn provider_registration_starts_pending_traveler_approved() {
        let api = MockDataProvider::new();

        let provider = api
            .register("Jane", "jane@x.com", "secret1", "provider")
            .await
            .unwrap();
        assert_eq!(provider.user.status, "pending");

        let traveler = api
            .register("Joe", "joe@x.com", "secret1", "traveler")
            .await
            .unwrap();
        assert_eq!(traveler.user.status, "approved");
    }
}
