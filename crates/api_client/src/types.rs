use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// An account as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    /// Account id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Account role (`traveler`, `provider`, `admin`).
    pub role: String,
    /// Traveler interest tags.
    pub interests: Vec<String>,
    /// Account lifecycle status (`pending`, `approved`, `rejected`).
    pub status: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// An experience listing as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceSummary {
    /// Listing id.
    pub id: Uuid,
    /// Listing title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Image reference.
    pub image: String,
    /// Price per booking, if set.
    pub price: Option<f64>,
    /// Listing category (`AR_site`, `eco_tour`, `heritage`).
    pub category: String,
    /// Human-readable location.
    pub location: String,
    /// Display rating.
    pub rating: f64,
    /// Provider that submitted the listing.
    pub provider_id: Uuid,
    /// Listing lifecycle status.
    pub status: String,
    /// When the listing was submitted.
    pub created_at: DateTime<Utc>,
}

/// A booking row as returned by the creation and confirmation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRecord {
    /// Booking id.
    pub id: Uuid,
    /// The booked experience.
    pub experience_id: Uuid,
    /// The traveler who booked it.
    pub traveler_id: Uuid,
    /// Booking lifecycle status.
    pub status: String,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
}

/// A booking enriched with experience details, as returned by the list
/// endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingSummary {
    /// Booking id.
    pub id: Uuid,
    /// The booked experience.
    pub experience_id: Uuid,
    /// Title of the booked experience.
    pub experience_title: String,
    /// Location of the booked experience.
    pub location: String,
    /// The traveler who booked it.
    pub traveler_id: Uuid,
    /// Booking lifecycle status.
    pub status: String,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
}

/// A logged-in session: the bearer token plus the account it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated account.
    pub user: UserSummary,
}

/// Outcome of an admin broadcast.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastOutcome {
    /// Device tokens the broadcast targeted.
    pub requested: usize,
    /// Deliveries the push transport accepted.
    pub delivered: usize,
}

// Response envelopes used by the REST API.

#[derive(Debug, Deserialize)]
pub(crate) struct ProvidersEnvelope {
    pub providers: Vec<UserSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderEnvelope {
    pub provider: UserSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExperiencesEnvelope {
    pub experiences: Vec<ExperienceSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExperienceEnvelope {
    pub experience: ExperienceSummary,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookingsEnvelope {
    pub bookings: Vec<BookingSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookingEnvelope {
    pub booking: BookingRecord,
}

/// Error body the REST API attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: String,
    pub message: String,
}
