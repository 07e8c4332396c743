use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::booking_types::*;
use crate::experience_types::ExperienceStatus;

/// Column list shared by every query that reads a full booking row.
const BOOKING_COLUMNS: &str =
    "id, experience_id, traveler_id, status, created_at, updated_at";

/// Service for booking operations.
pub struct BookingService {
    pool: PgPool,
}

impl BookingService {
    /// Creates a new instance with the provided database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Books an experience for a traveler.
    ///
    /// The experience must be approved at this moment; the check is not
    /// re-verified later, so a listing rejected afterwards keeps its
    /// existing bookings. Returns the booking together with the provider
    /// contact so the handler can notify them.
    pub async fn create(
        &self,
        traveler_id: &Uuid,
        experience_id: &Uuid,
    ) -> Result<(Booking, BookingContact), BookingError> {
        let row = sqlx::query(
            r#"
            SELECT e.title, e.status, u.push_token
            FROM experiences e
            JOIN users u ON e.provider_id = u.id
            WHERE e.id = $1
            "#,
        )
        .bind(experience_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BookingError::ExperienceNotFound)?;

        let status: String = row.get("status");
        if ExperienceStatus::parse(&status) != Some(ExperienceStatus::Approved) {
            return Err(BookingError::NotBookable);
        }

        let contact = BookingContact {
            push_token: row.get("push_token"),
            experience_title: row.get("title"),
        };

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bookings (experience_id, traveler_id, status)
            VALUES ($1, $2, $3)
            RETURNING {BOOKING_COLUMNS}
            "#,
        ))
        .bind(experience_id)
        .bind(traveler_id)
        .bind(BookingStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok((booking_from_row(&row)?, contact))
    }

    /// Lists a traveler's own bookings with experience details, newest first.
    pub async fn list_for_traveler(
        &self,
        traveler_id: &Uuid,
    ) -> Result<Vec<BookingWithExperience>, BookingError> {
        let rows = sqlx::query(
            r#"
            SELECT
                b.id, b.experience_id, b.traveler_id, b.status, b.created_at,
                COALESCE(e.title, 'Unknown experience') as experience_title,
                COALESCE(e.location, '') as location
            FROM bookings b
            LEFT JOIN experiences e ON b.experience_id = e.id
            WHERE b.traveler_id = $1
            ORDER BY b.created_at DESC
            "#,
        )
        .bind(traveler_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(booking_with_experience_from_row).collect()
    }

    /// Lists every booking for the admin overview, newest first.
    pub async fn list_all(&self) -> Result<Vec<BookingWithExperience>, BookingError> {
        let rows = sqlx::query(
            r#"
            SELECT
                b.id, b.experience_id, b.traveler_id, b.status, b.created_at,
                COALESCE(e.title, 'Unknown experience') as experience_title,
                COALESCE(e.location, '') as location
            FROM bookings b
            LEFT JOIN experiences e ON b.experience_id = e.id
            ORDER BY b.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(booking_with_experience_from_row).collect()
    }

    /// Confirms a booking and returns it together with the traveler
    /// contact so the handler can notify them.
    ///
    /// Deliberately unguarded: the current status is not inspected, so
    /// confirming twice succeeds. Two concurrent admin actions race and
    /// the last write wins. Confirmation and the follow-up notification
    /// are two independent operations; a failed push leaves the booking
    /// confirmed.
    pub async fn confirm(
        &self,
        booking_id: &Uuid,
    ) -> Result<(Booking, BookingContact), BookingError> {
        let row = sqlx::query(&format!(
            "UPDATE bookings SET status = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(BookingStatus::Confirmed.as_str())
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(BookingError::NotFound)?;

        let booking = booking_from_row(&row)?;

        let row = sqlx::query(
            r#"
            SELECT u.push_token, COALESCE(e.title, 'Unknown experience') as experience_title
            FROM bookings b
            JOIN users u ON b.traveler_id = u.id
            LEFT JOIN experiences e ON b.experience_id = e.id
            WHERE b.id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await?;

        let contact = BookingContact {
            push_token: row.get("push_token"),
            experience_title: row.get("experience_title"),
        };

        Ok((booking, contact))
    }
}

/// Maps a database row onto the booking model, parsing the status string
/// into its closed enum.
fn booking_from_row(row: &PgRow) -> Result<Booking, BookingError> {
    let status_raw: String = row.get("status");
    let status = BookingStatus::parse(&status_raw).ok_or_else(|| {
        BookingError::Validation(format!("Unknown status in database: {}", status_raw))
    })?;

    Ok(Booking {
        id: row.get("id"),
        experience_id: row.get("experience_id"),
        traveler_id: row.get("traveler_id"),
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn booking_with_experience_from_row(
    row: &PgRow,
) -> Result<BookingWithExperience, BookingError> {
    let status_raw: String = row.get("status");
    let status = BookingStatus::parse(&status_raw).ok_or_else(|| {
        BookingError::Validation(format!("Unknown status in database: {}", status_raw))
    })?;

    Ok(BookingWithExperience {
        id: row.get("id"),
        experience_id: row.get("experience_id"),
        experience_title: row.get("experience_title"),
        location: row.get("location"),
        traveler_id: row.get("traveler_id"),
        status,
        created_at: row.get("created_at"),
    })
}
