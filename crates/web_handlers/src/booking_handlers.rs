use actix_web::{HttpResponse, Result, web};

use crate::booking_service::BookingService;
use crate::booking_types::*;
use auth_services::middleware::{AdminUser, TravelerUser};
use notification_services::Notifier;

/// Books an approved experience for the authenticated traveler and pushes
/// a heads-up to the provider. A failed push is logged but the booking
/// stands.
pub async fn create_booking(
    pool: web::Data<sqlx::PgPool>,
    notifier: web::Data<Notifier>,
    traveler: TravelerUser,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, BookingError> {
    let booking_service = BookingService::new(pool.get_ref().clone());
    let (booking, provider) = booking_service
        .create(&traveler.0.id, &request.experience_id)
        .await?;

    if let Err(e) = notifier
        .booking_created(provider.push_token.as_deref(), &provider.experience_title)
        .await
    {
        log::error!("Failed to notify provider of booking {}: {}", booking.id, e);
    }

    Ok(HttpResponse::Created().json(serde_json::json!({ "booking": booking })))
}

/// Lists the authenticated traveler's own bookings.
pub async fn my_bookings(
    pool: web::Data<sqlx::PgPool>,
    traveler: TravelerUser,
) -> Result<HttpResponse, BookingError> {
    let booking_service = BookingService::new(pool.get_ref().clone());
    let bookings = booking_service.list_for_traveler(&traveler.0.id).await?;

    let response = ListBookingsResponse {
        total: bookings.len() as i64,
        bookings,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Confirms a booking and pushes the confirmation to the traveler. A
/// failed push is logged but the confirmation stands.
pub async fn confirm_booking(
    pool: web::Data<sqlx::PgPool>,
    notifier: web::Data<Notifier>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, BookingError> {
    let booking_id = path.into_inner();
    let booking_service = BookingService::new(pool.get_ref().clone());
    let (booking, traveler) = booking_service.confirm(&booking_id).await?;

    if let Err(e) = notifier
        .booking_confirmed(traveler.push_token.as_deref(), &traveler.experience_title)
        .await
    {
        log::error!(
            "Failed to notify traveler of confirmation {}: {}",
            booking.id,
            e
        );
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "booking": booking })))
}
