use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Categories an experience can be listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Augmented-reality overlay at a physical site.
    #[serde(rename = "AR_site")]
    ArSite,
    /// Guided eco tour.
    #[serde(rename = "eco_tour")]
    EcoTour,
    /// Heritage and cultural activity.
    #[serde(rename = "heritage")]
    Heritage,
}

impl Category {
    /// Wire/database representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ArSite => "AR_site",
            Category::EcoTour => "eco_tour",
            Category::Heritage => "heritage",
        }
    }

    /// Parses the wire/database representation.
    pub fn parse(s: &str) -> Option<Category> {
        match s {
            "AR_site" => Some(Category::ArSite),
            "eco_tour" => Some(Category::EcoTour),
            "heritage" => Some(Category::Heritage),
            _ => None,
        }
    }
}

/// Lifecycle status of an experience listing.
///
/// Transitions are unconditional overwrites triggered by admin actions;
/// there is no guard requiring the current value to be `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceStatus {
    /// Awaiting admin review.
    Pending,
    /// Bookable by travelers.
    Approved,
    /// Turned down by an admin.
    Rejected,
}

impl ExperienceStatus {
    /// Wire/database representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceStatus::Pending => "pending",
            ExperienceStatus::Approved => "approved",
            ExperienceStatus::Rejected => "rejected",
        }
    }

    /// Parses the wire/database representation.
    pub fn parse(s: &str) -> Option<ExperienceStatus> {
        match s {
            "pending" => Some(ExperienceStatus::Pending),
            "approved" => Some(ExperienceStatus::Approved),
            "rejected" => Some(ExperienceStatus::Rejected),
            _ => None,
        }
    }
}

/// A bookable tourism offering submitted by a provider.
#[derive(Debug, Clone, Serialize)]
pub struct Experience {
    /// Unique identifier for the experience.
    pub id: Uuid,
    /// Listing title.
    pub title: String,
    /// Longer description shown on the detail screen.
    pub description: String,
    /// Image reference: a path under `uploads/` or an absolute URL.
    pub image: String,
    /// Price per booking, if the provider set one.
    pub price: Option<f64>,
    /// Listing category.
    pub category: Category,
    /// Human-readable location.
    pub location: String,
    /// Display rating, assigned at creation.
    pub rating: f64,
    /// Provider that submitted the listing.
    pub provider_id: Uuid,
    /// Listing lifecycle status.
    pub status: ExperienceStatus,
    /// When the listing was submitted.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Request structure for submitting a new experience.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateExperienceRequest {
    /// Listing title.
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    /// Longer description shown on the detail screen.
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Image reference: a path under `uploads/` or an absolute URL.
    #[validate(length(min = 1, message = "Image is required"))]
    pub image: String,

    /// Price per booking.
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,

    /// Listing category.
    pub category: Category,

    /// Human-readable location.
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
}

/// Query parameters for the admin experience list.
#[derive(Debug, Deserialize)]
pub struct ExperienceListQuery {
    /// Optional status filter (`pending`, `approved`, `rejected`).
    pub status: Option<String>,
}

/// Response structure for experience lists.
#[derive(Debug, Serialize)]
pub struct ListExperiencesResponse {
    /// The experiences, newest first.
    pub experiences: Vec<Experience>,
    /// Total count.
    pub total: i64,
}

/// Custom error type for experience operations.
#[derive(thiserror::Error, Debug)]
pub enum ExperienceError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Experience not found
    #[error("Experience not found")]
    NotFound,
}

impl actix_web::ResponseError for ExperienceError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            ExperienceError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            ExperienceError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "experience_not_found",
                "message": "Experience not found"
            })),
            ExperienceError::Database(e) => {
                log::error!("Database error in experience handler: {}", e);
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
    use validator::Validate;

    #[test]
    fn category_round_trips_through_wire_strings() {
        for category in [Category::ArSite, Category::EcoTour, Category::Heritage] {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("road_trip"), None);
    }

    #[test]
    fn category_uses_legacy_wire_names() {
        assert_eq!(
            serde_json::to_string(&Category::ArSite).unwrap(),
            "\"AR_site\""
        );
        let parsed: Category = serde_json::from_str("\"eco_tour\"").unwrap();
        assert_eq!(parsed, Category::EcoTour);
    }

    #[test]
    fn create_request_requires_all_text_fields() {
        let request = CreateExperienceRequest {
            title: String::new(),
            description: "Walk the old town with AR overlays".to_string(),
            image: "uploads/old-town.jpg".to_string(),
            price: Some(25.0),
            category: Category::ArSite,
            location: "Porto".to_string(),
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_rejects_negative_price() {
        let request = CreateExperienceRequest {
            title: "Old Town AR Walk".to_string(),
            description: "Walk the old town with AR overlays".to_string(),
            image: "uploads/old-town.jpg".to_string(),
            price: Some(-1.0),
            category: Category::ArSite,
            location: "Porto".to_string(),
        };

        assert!(request.validate().is_err());
    }
}
