use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a booking.
///
/// `Completed` and `Cancelled` are declared for the mobile apps but no
/// server-side transition produces them yet; the only admin action is
/// confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created by a traveler, awaiting admin confirmation.
    Pending,
    /// Confirmed by an admin.
    Confirmed,
    /// Trip happened (reserved for future use).
    Completed,
    /// Called off (reserved for future use).
    Cancelled,
}

impl BookingStatus {
    /// Wire/database representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Parses the wire/database representation.
    pub fn parse(s: &str) -> Option<BookingStatus> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

/// A traveler's reservation against an approved experience.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    /// Unique identifier for the booking.
    pub id: Uuid,
    /// The booked experience.
    pub experience_id: Uuid,
    /// The traveler who booked it.
    pub traveler_id: Uuid,
    /// Booking lifecycle status.
    pub status: BookingStatus,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When the booking was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Booking enriched with experience information for list screens.
#[derive(Debug, Serialize)]
pub struct BookingWithExperience {
    /// Unique identifier for the booking.
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
    pub status: BookingStatus,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
}

/// Request structure for creating a booking.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    /// The experience to book; must currently be approved.
    pub experience_id: Uuid,
}

/// Response structure for listing bookings.
#[derive(Debug, Serialize)]
pub struct ListBookingsResponse {
    /// The bookings, newest first.
    pub bookings: Vec<BookingWithExperience>,
    /// Total count.
    pub total: i64,
}

/// Contact details needed to notify the counterparty of a booking event.
#[derive(Debug, Clone)]
pub struct BookingContact {
    /// Push token of the device to notify, when one is registered.
    pub push_token: Option<String>,
    /// Title of the experience, for the notification text.
    pub experience_title: String,
}

/// Custom error type for booking operations.
#[derive(thiserror::Error, Debug)]
pub enum BookingError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Booking not found
    #[error("Booking not found")]
    NotFound,

    /// The referenced experience does not exist
    #[error("Experience not found")]
    ExperienceNotFound,

    /// The referenced experience is not approved for booking
    #[error("Experience is not open for booking")]
    NotBookable,
}

impl actix_web::ResponseError for BookingError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            BookingError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            BookingError::NotBookable => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "experience_not_bookable",
                "message": "This experience is not open for booking"
            })),
            BookingError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "booking_not_found",
                "message": "Booking not found"
            })),
            BookingError::ExperienceNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "experience_not_found",
                "message": "Experience not found"
            })),
            BookingError::Database(e) => {
                log::error!("Database error in booking handler: {}", e);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "internal_error",
                    "message": "An internal error occurred"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_wire_strings() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("refunded"), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Confirmed).unwrap(),
            "\"confirmed\""
        );
    }
}
