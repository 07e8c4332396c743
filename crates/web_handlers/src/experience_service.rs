use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::experience_types::*;

/// Column list shared by every query that reads a full experience row.
const EXPERIENCE_COLUMNS: &str = "id, title, description, image, price, category, location, \
     rating, provider_id, status, created_at, updated_at";

/// Service for experience listing operations.
pub struct ExperienceService {
    pool: PgPool,
}

impl ExperienceService {
    /// Creates a new instance with the provided database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a provider's submission as a pending listing.
    ///
    /// The display rating is assigned at creation; travelers cannot rate
    /// experiences through the API.
    pub async fn create(
        &self,
        provider_id: &Uuid,
        request: &CreateExperienceRequest,
    ) -> Result<Experience, ExperienceError> {
        let rating = random_rating();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO experiences (
                title, description, image, price, category, location, rating, provider_id, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EXPERIENCE_COLUMNS}
            "#,
        ))
        .bind(request.title.trim())
        .bind(&request.description)
        .bind(&request.image)
        .bind(request.price)
        .bind(request.category.as_str())
        .bind(&request.location)
        .bind(rating)
        .bind(provider_id)
        .bind(ExperienceStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        experience_from_row(&row)
    }

    /// Lists the approved experiences travelers can browse, newest first.
    pub async fn list_approved(&self) -> Result<Vec<Experience>, ExperienceError> {
        let rows = sqlx::query(&format!(
            "SELECT {EXPERIENCE_COLUMNS} FROM experiences \
             WHERE status = 'approved' ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(experience_from_row).collect()
    }

    /// Lists a provider's own submissions regardless of status.
    pub async fn list_by_provider(
        &self,
        provider_id: &Uuid,
    ) -> Result<Vec<Experience>, ExperienceError> {
        let rows = sqlx::query(&format!(
            "SELECT {EXPERIENCE_COLUMNS} FROM experiences \
             WHERE provider_id = $1 ORDER BY created_at DESC"
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(experience_from_row).collect()
    }

    /// Lists every experience for the admin review queue, optionally
    /// narrowed to one status.
    pub async fn list_all(
        &self,
        status: Option<ExperienceStatus>,
    ) -> Result<Vec<Experience>, ExperienceError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {EXPERIENCE_COLUMNS} FROM experiences \
                     WHERE status = $1 ORDER BY created_at DESC"
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {EXPERIENCE_COLUMNS} FROM experiences ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(experience_from_row).collect()
    }

    /// Overwrites a listing's lifecycle status and returns the updated row.
    ///
    /// Deliberately unguarded: the current status is not inspected, so a
    /// second approve succeeds and approve-then-reject lands on rejected.
    /// Two concurrent admin actions race and the last write wins.
    pub async fn set_status(
        &self,
        experience_id: &Uuid,
        status: ExperienceStatus,
    ) -> Result<Experience, ExperienceError> {
        let row = sqlx::query(&format!(
            "UPDATE experiences SET status = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING {EXPERIENCE_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(experience_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ExperienceError::NotFound)?;

        experience_from_row(&row)
    }
}

/// Maps a database row onto the experience model, parsing the category
/// and status strings into their closed enums.
pub(crate) fn experience_from_row(row: &PgRow) -> Result<Experience, ExperienceError> {
    let category_raw: String = row.get("category");
    let status_raw: String = row.get("status");

    let category = Category::parse(&category_raw).ok_or_else(|| {
        ExperienceError::Validation(format!("Unknown category in database: {}", category_raw))
    })?;
    let status = ExperienceStatus::parse(&status_raw).ok_or_else(|| {
        ExperienceError::Validation(format!("Unknown status in database: {}", status_raw))
    })?;

    Ok(Experience {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        image: row.get("image"),
        price: row.get("price"),
        category,
        location: row.get("location"),
        rating: row.get("rating"),
        provider_id: row.get("provider_id"),
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Picks the display rating assigned to a fresh listing: 3.0 to 5.0 in
/// steps of 0.1.
fn random_rating() -> f64 {
    use rand::Rng;
    let mut rng = rand::rng();
    rng.random_range(30..=50) as f64 / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_ratings_stay_in_display_range() {
        for _ in 0..100 {
            let rating = random_rating();
            assert!((3.0..=5.0).contains(&rating), "rating {} out of range", rating);
            // One decimal place only.
            assert!((rating * 10.0 - (rating * 10.0).round()).abs() < 1e-9);
        }
    }
}
