use actix_web::{HttpResponse, Result, web};
use validator::Validate;

use crate::experience_service::ExperienceService;
use crate::experience_types::*;
use auth_services::middleware::ProviderUser;

/// Lists the approved experiences. Public: this is the traveler catalog.
pub async fn list_experiences(
    pool: web::Data<sqlx::PgPool>,
) -> Result<HttpResponse, ExperienceError> {
    let experience_service = ExperienceService::new(pool.get_ref().clone());
    let experiences = experience_service.list_approved().await?;

    let response = ListExperiencesResponse {
        total: experiences.len() as i64,
        experiences,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Accepts a provider's new listing; it enters the admin review queue as
/// pending and stays out of the public catalog until approved.
pub async fn submit_experience(
    pool: web::Data<sqlx::PgPool>,
    provider: ProviderUser,
    request: web::Json<CreateExperienceRequest>,
) -> Result<HttpResponse, ExperienceError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| ExperienceError::Validation(format!("Validation error: {}", e)))?;

    let experience_service = ExperienceService::new(pool.get_ref().clone());
    let experience = experience_service.create(&provider.0.id, &request).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "experience": experience })))
}

/// Lists the authenticated provider's own submissions, every status
/// included so they can see what is still under review.
pub async fn my_experiences(
    pool: web::Data<sqlx::PgPool>,
    provider: ProviderUser,
) -> Result<HttpResponse, ExperienceError> {
    let experience_service = ExperienceService::new(pool.get_ref().clone());
    let experiences = experience_service.list_by_provider(&provider.0.id).await?;

    let response = ListExperiencesResponse {
        total: experiences.len() as i64,
        experiences,
    };

    Ok(HttpResponse::Ok().json(response))
}
