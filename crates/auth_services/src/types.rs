use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Roles a marketplace account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Books approved experiences.
    Traveler,
    /// Submits experiences for admin review.
    Provider,
    /// Reviews providers, experiences, and bookings.
    Admin,
}

impl Role {
    /// Wire/database representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Traveler => "traveler",
            Role::Provider => "provider",
            Role::Admin => "admin",
        }
    }

    /// Parses the wire/database representation.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "traveler" => Some(Role::Traveler),
            "provider" => Some(Role::Provider),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Lifecycle status of an account.
///
/// Transitions are unconditional overwrites triggered by admin actions;
/// there is no guard requiring the current value to be `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Awaiting admin review (providers start here).
    Pending,
    /// Visible/usable on the platform.
    Approved,
    /// Turned down by an admin.
    Rejected,
}

impl AccountStatus {
    /// Wire/database representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "pending",
            AccountStatus::Approved => "approved",
            AccountStatus::Rejected => "rejected",
        }
    }

    /// Parses the wire/database representation.
    pub fn parse(s: &str) -> Option<AccountStatus> {
        match s {
            "pending" => Some(AccountStatus::Pending),
            "approved" => Some(AccountStatus::Approved),
            "rejected" => Some(AccountStatus::Rejected),
            _ => None,
        }
    }

    /// Status a fresh account starts in: providers wait for admin review,
    /// everyone else is usable immediately.
    pub fn default_for(role: Role) -> AccountStatus {
        match role {
            Role::Provider => AccountStatus::Pending,
            Role::Traveler | Role::Admin => AccountStatus::Approved,
        }
    }
}

// Database model - matching the exact schema
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier for the account.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email, unique per account.
    pub email: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Account role.
    pub role: Role,
    /// Traveler interest tags used by itinerary suggestions.
    pub interests: Vec<String>,
    /// Account lifecycle status.
    pub status: AccountStatus,
    /// Bcrypt hash of the password, never exposed in responses.
    pub password_hash: String,
    /// Outstanding password-reset token, if any.
    pub reset_token: Option<String>,
    /// Expiry of the outstanding reset token.
    pub reset_token_expiry: Option<DateTime<Utc>>,
    /// Expo push token of the account's last registered device.
    pub push_token: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Public view of an account, safe to return from the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// Unique identifier for the account.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Account role.
    pub role: Role,
    /// Traveler interest tags.
    pub interests: Vec<String>,
    /// Account lifecycle status.
    pub status: AccountStatus,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            interests: user.interests,
            status: user.status,
            created_at: user.created_at,
        }
    }
}

/// Request structure for account registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    /// Login email.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Plaintext password, hashed before storage.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Requested role; only traveler and provider may self-register.
    pub role: Role,

    /// Optional contact phone number.
    pub phone: Option<String>,

    /// Optional traveler interest tags.
    pub interests: Option<Vec<String>>,
}

/// Request structure for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response carrying a bearer token and the account it belongs to.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Signed bearer token for subsequent requests.
    pub token: String,
    /// The authenticated account.
    pub user: UserInfo,
}

/// Request structure for updating the caller's own profile.
/// Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name.
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: Option<String>,

    /// New contact phone number.
    pub phone: Option<String>,

    /// New interest tags.
    pub interests: Option<Vec<String>>,

    /// Expo push token of the device currently logged in.
    pub push_token: Option<String>,
}

/// Request structure for changing the caller's password.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password, verified before the change is applied.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    /// Replacement password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Request structure for starting a password reset.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email of the account to reset.
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
}

/// Request structure for redeeming a password-reset token.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Token received by email.
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    /// Replacement password.
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

// JWT Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// Login email.
    pub email: String,
    /// Account role.
    pub role: Role,
    /// Expiration timestamp.
    pub exp: usize,
    /// Issued-at timestamp.
    pub iat: usize,
}

// Error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already exists")]
    EmailExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Authorization token is required")]
    MissingToken,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl actix_web::ResponseError for AuthError {
    fn error_response(&self) -> actix_web::HttpResponse {
        use actix_web::HttpResponse;

        match self {
            AuthError::EmailExists => HttpResponse::Conflict().json(serde_json::json!({
                "error": "email_exists",
                "message": "An account with this email already exists"
            })),
            AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "invalid_credentials",
                "message": "Invalid email or password"
            })),
            AuthError::MissingToken => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "missing_token",
                "message": "Authorization token is required"
            })),
            AuthError::InvalidToken => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": "invalid_token",
                "message": "Invalid or expired token"
            })),
            AuthError::Forbidden => HttpResponse::Forbidden().json(serde_json::json!({
                "error": "forbidden",
                "message": "You do not have permission to perform this action"
            })),
            AuthError::UserNotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": "user_not_found",
                "message": "User not found"
            })),
            AuthError::InvalidResetToken => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_reset_token",
                "message": "This reset token is invalid or has expired"
            })),
            AuthError::Validation(msg) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "validation_error",
                "message": msg
            })),
            _ => {
                log::error!("Internal auth error: {}", self);
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
    fn role_round_trips_through_wire_strings() {
        for role in [Role::Traveler, Role::Provider, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn status_round_trips_through_wire_strings() {
        for status in [
            AccountStatus::Pending,
            AccountStatus::Approved,
            AccountStatus::Rejected,
        ] {
            assert_eq!(AccountStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AccountStatus::parse("waitlisted"), None);
    }

    #[test]
    fn providers_start_pending_everyone_else_approved() {
        assert_eq!(
            AccountStatus::default_for(Role::Provider),
            AccountStatus::Pending
        );
        assert_eq!(
            AccountStatus::default_for(Role::Traveler),
            AccountStatus::Approved
        );
        assert_eq!(
            AccountStatus::default_for(Role::Admin),
            AccountStatus::Approved
        );
    }

    #[test]
    fn register_request_rejects_short_password() {
        let request = RegisterRequest {
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            password: "abc".to_string(),
            role: Role::Provider,
            phone: None,
            interests: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn register_request_accepts_typical_signup() {
        let request = RegisterRequest {
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            password: "secret1".to_string(),
            role: Role::Provider,
            phone: None,
            interests: None,
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn role_deserializes_from_lowercase_json() {
        let role: Role = serde_json::from_str("\"provider\"").unwrap();
        assert_eq!(role, Role::Provider);
        assert!(serde_json::from_str::<Role>("\"Provider\"").is_err());
    }
}
