use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::booking_service::BookingService;
use crate::booking_types::{BookingError, ListBookingsResponse};
use crate::experience_service::ExperienceService;
use crate::experience_types::{
    ExperienceError, ExperienceListQuery, ExperienceStatus, ListExperiencesResponse,
};
use auth_services::middleware::AdminUser;
use auth_services::service::AuthService;
use auth_services::types::{AccountStatus, AuthError, UserInfo};
use notification_services::Notifier;

/// Query parameters for the admin provider list.
#[derive(Debug, Deserialize)]
pub struct ProviderListQuery {
    /// Optional status filter (`pending`, `approved`, `rejected`).
    pub status: Option<String>,
}

/// Request structure for broadcasting a push notification.
#[derive(Debug, Deserialize, Validate)]
pub struct BroadcastRequest {
    /// Notification title.
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    /// Notification body text.
    #[validate(length(min = 1, message = "Body is required"))]
    pub body: String,
}

/// Lists provider accounts for the review queue, optionally narrowed by
/// `?status=`.
pub async fn list_providers(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    query: web::Query<ProviderListQuery>,
) -> Result<HttpResponse, AuthError> {
    let status = parse_account_status_filter(query.status.as_deref())?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    let providers = auth_service.list_providers(status).await?;

    let providers: Vec<UserInfo> = providers.into_iter().map(UserInfo::from).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "total": providers.len(),
        "providers": providers
    })))
}

/// Transitions a provider to approved.
pub async fn approve_provider(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, AuthError> {
    set_provider_status(pool, path.into_inner(), AccountStatus::Approved).await
}

/// Transitions a provider to rejected.
pub async fn reject_provider(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, AuthError> {
    set_provider_status(pool, path.into_inner(), AccountStatus::Rejected).await
}

async fn set_provider_status(
    pool: web::Data<PgPool>,
    provider_id: uuid::Uuid,
    status: AccountStatus,
) -> Result<HttpResponse, AuthError> {
    let auth_service = AuthService::new(pool.get_ref().clone());
    let provider = auth_service.set_account_status(&provider_id, status).await?;

    // No notification goes out to the affected provider here; only the
    // booking lifecycle pushes messages.
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "provider": UserInfo::from(provider)
    })))
}

/// Lists experiences for the review queue, optionally narrowed by
/// `?status=`.
pub async fn list_admin_experiences(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    query: web::Query<ExperienceListQuery>,
) -> Result<HttpResponse, ExperienceError> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(ExperienceStatus::parse(raw).ok_or_else(|| {
            ExperienceError::Validation(format!("Unknown status filter: {}", raw))
        })?),
        None => None,
    };

    let experience_service = ExperienceService::new(pool.get_ref().clone());
    let experiences = experience_service.list_all(status).await?;

    let response = ListExperiencesResponse {
        total: experiences.len() as i64,
        experiences,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Transitions an experience to approved, making it bookable.
pub async fn approve_experience(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, ExperienceError> {
    set_experience_status(pool, path.into_inner(), ExperienceStatus::Approved).await
}

/// Transitions an experience to rejected.
pub async fn reject_experience(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, ExperienceError> {
    set_experience_status(pool, path.into_inner(), ExperienceStatus::Rejected).await
}

async fn set_experience_status(
    pool: web::Data<PgPool>,
    experience_id: uuid::Uuid,
    status: ExperienceStatus,
) -> Result<HttpResponse, ExperienceError> {
    let experience_service = ExperienceService::new(pool.get_ref().clone());
    let experience = experience_service.set_status(&experience_id, status).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "experience": experience
    })))
}

/// Lists every account on the platform.
pub async fn list_users(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
) -> Result<HttpResponse, AuthError> {
    let auth_service = AuthService::new(pool.get_ref().clone());
    let users = auth_service.list_users().await?;

    let users: Vec<UserInfo> = users.into_iter().map(UserInfo::from).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "total": users.len(),
        "users": users
    })))
}

/// Lists every booking on the platform.
pub async fn list_admin_bookings(
    pool: web::Data<PgPool>,
    _admin: AdminUser,
) -> Result<HttpResponse, BookingError> {
    let booking_service = BookingService::new(pool.get_ref().clone());
    let bookings = booking_service.list_all().await?;

    let response = ListBookingsResponse {
        total: bookings.len() as i64,
        bookings,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Broadcasts a push notification to every account that registered a
/// device token. Per-device failures are logged and skipped.
pub async fn broadcast_notification(
    pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
    _admin: AdminUser,
    request: web::Json<BroadcastRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    let tokens = auth_service.list_push_tokens().await?;

    let delivered = notifier.broadcast(&tokens, &request.title, &request.body).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "requested": tokens.len(),
        "delivered": delivered
    })))
}

fn parse_account_status_filter(raw: Option<&str>) -> Result<Option<AccountStatus>, AuthError> {
    match raw {
        Some(raw) => AccountStatus::parse(raw)
            .map(Some)
            .ok_or_else(|| AuthError::Validation(format!("Unknown status filter: {}", raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_parses_known_values() {
        assert_eq!(
            parse_account_status_filter(Some("pending")).unwrap(),
            Some(AccountStatus::Pending)
        );
        assert_eq!(parse_account_status_filter(None).unwrap(), None);
        assert!(parse_account_status_filter(Some("archived")).is_err());
    }

    #[test]
    fn broadcast_request_requires_title_and_body() {
        let request = BroadcastRequest {
            title: String::new(),
            body: "We are back".to_string(),
        };
        assert!(request.validate().is_err());

        let request = BroadcastRequest {
            title: "Maintenance over".to_string(),
            body: "We are back".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
