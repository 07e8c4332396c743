use actix_web::{HttpResponse, Result, web};
use sqlx::PgPool;
use validator::Validate;

use auth_services::jwt::JwtService;
use auth_services::middleware::AuthenticatedUser;
use auth_services::service::AuthService;
use auth_services::types::*;
use notification_services::Notifier;

/// Handles account registration by validating the request, creating the
/// user with its role-dependent starting status, and returning a bearer
/// token with the user info. Returns a 201 Created response.
pub async fn register(
    pool: web::Data<PgPool>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    let jwt_service = JwtService::new();

    // Create the user
    let user = auth_service.create_user(&request).await?;

    // Generate the bearer token
    let token = jwt_service.generate_token(&user)?;

    let response = AuthResponse {
        token,
        user: user.into(),
    };

    Ok(HttpResponse::Created().json(response))
}

/// Handles login by validating the request, verifying credentials, and
/// returning a bearer token with the user info.
pub async fn login(
    pool: web::Data<PgPool>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    let jwt_service = JwtService::new();

    // Verify credentials
    let user = auth_service
        .verify_password(&request.email, &request.password)
        .await?;

    // Generate the bearer token
    let token = jwt_service.generate_token(&user)?;

    let response = AuthResponse {
        token,
        user: user.into(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Returns the authenticated caller's own profile.
pub async fn me(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AuthError> {
    let auth_service = AuthService::new(pool.get_ref().clone());

    let user = auth_service
        .get_user_by_id(&user.0.id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(UserInfo::from(user)))
}

/// Updates the authenticated caller's profile fields; absent fields stay
/// unchanged. This is also where the mobile apps store their push token.
pub async fn update_profile(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    request: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    let updated_user = auth_service.update_user_profile(&user.0.id, &request).await?;

    Ok(HttpResponse::Ok().json(UserInfo::from(updated_user)))
}

/// Changes the authenticated caller's password after verifying the
/// current one.
pub async fn change_password(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    request: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    auth_service
        .change_password(&user.0.id, &request.current_password, &request.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password changed successfully"
    })))
}

/// Starts a password reset. Responds identically whether or not the email
/// is registered, so the endpoint cannot be used to probe for accounts.
pub async fn forgot_password(
    pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
    request: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());

    if let Some((user, token)) = auth_service.begin_password_reset(&request.email).await? {
        if let Err(e) = notifier
            .password_reset_email(&user.email, &user.name, &token)
            .await
        {
            log::error!("Failed to send reset email to {}: {}", user.email, e);
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "If the email is registered, a reset token has been sent"
    })))
}

/// Redeems a password-reset token and sets the new password.
pub async fn reset_password(
    pool: web::Data<PgPool>,
    request: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AuthError> {
    // Validate the request
    request
        .validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let auth_service = AuthService::new(pool.get_ref().clone());
    auth_service
        .reset_password(&request.token, &request.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password has been reset"
    })))
}

/// Liveness probe.
pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": "wanderlens-api",
        "status": "healthy",
        "timestamp": chrono::Utc::now()
    })))
}
