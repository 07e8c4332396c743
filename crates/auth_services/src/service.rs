use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::types::{
    AccountStatus, AuthError, RegisterRequest, Role, UpdateProfileRequest, User,
};

/// Column list shared by every query that reads a full user row.
const USER_COLUMNS: &str = "id, name, email, phone, role, interests, status, password_hash, \
     reset_token, reset_token_expiry, push_token, created_at, updated_at";

/// How long a password-reset token stays redeemable.
const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// Service for account management and authentication operations.
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    /// Creates a new instance with the provided database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers a new traveler or provider account.
    ///
    /// Providers start in `pending` and stay invisible until an admin
    /// approves them; travelers are usable immediately.
    pub async fn create_user(&self, request: &RegisterRequest) -> Result<User, AuthError> {
        if request.role == Role::Admin {
            return Err(AuthError::Validation(
                "Admin accounts cannot be self-registered".to_string(),
            ));
        }

        // Check if email already exists
        let existing_user = sqlx::query("SELECT id FROM users WHERE email = $1")
            .bind(request.email.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;

        if existing_user.is_some() {
            return Err(AuthError::EmailExists);
        }

        // Hash the password
        let password_hash = hash(&request.password, DEFAULT_COST)?;

        let status = AccountStatus::default_for(request.role);
        let interests = request.interests.clone().unwrap_or_default();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (
                name, email, phone, role, interests, status, password_hash
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(request.name.trim())
        .bind(request.email.to_lowercase().trim())
        .bind(&request.phone)
        .bind(request.role.as_str())
        .bind(&interests)
        .bind(status.as_str())
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await?;

        user_from_row(&row)
    }

    /// Looks up an account by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Looks up an account by id.
    pub async fn get_user_by_id(&self, user_id: &Uuid) -> Result<Option<User>, AuthError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Verifies login credentials, returning the account on success.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_valid = verify(password, &user.password_hash)?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Applies the provided profile fields, leaving absent ones unchanged.
    pub async fn update_user_profile(
        &self,
        user_id: &Uuid,
        request: &UpdateProfileRequest,
    ) -> Result<User, AuthError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($1, name),
                phone = COALESCE($2, phone),
                interests = COALESCE($3, interests),
                push_token = COALESCE($4, push_token),
                updated_at = NOW()
            WHERE id = $5
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&request.name)
        .bind(&request.phone)
        .bind(&request.interests)
        .bind(&request.push_token)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AuthError::UserNotFound)?;

        user_from_row(&row)
    }

    /// Changes the caller's password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: &Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify(current_password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = hash(new_password, DEFAULT_COST)?;

        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Starts a password reset for the given email.
    ///
    /// Returns the account and the freshly issued token, or `None` when no
    /// such account exists (callers respond identically either way so the
    /// endpoint does not leak which emails are registered).
    pub async fn begin_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, AuthError> {
        let Some(user) = self.get_user_by_email(email).await? else {
            return Ok(None);
        };

        let token = generate_reset_token();
        let expiry = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        sqlx::query(
            "UPDATE users SET reset_token = $1, reset_token_expiry = $2, updated_at = NOW() \
             WHERE id = $3",
        )
        .bind(&token)
        .bind(expiry)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        Ok(Some((user, token)))
    }

    /// Redeems a password-reset token, setting the new password and
    /// clearing the token so it cannot be replayed.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        let row = sqlx::query(
            "SELECT id FROM users WHERE reset_token = $1 AND reset_token_expiry > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AuthError::InvalidResetToken)?;

        let user_id: Uuid = row.get("id");
        let password_hash = hash(new_password, DEFAULT_COST)?;

        sqlx::query(
            "UPDATE users SET password_hash = $1, reset_token = NULL, \
             reset_token_expiry = NULL, updated_at = NOW() WHERE id = $2",
        )
        .bind(&password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Overwrites an account's lifecycle status and returns the updated row.
    ///
    /// Deliberately unguarded: the current status is not inspected, so a
    /// second approve succeeds and approve-then-reject lands on rejected.
    /// Two concurrent admin actions race and the last write wins.
    pub async fn set_account_status(
        &self,
        user_id: &Uuid,
        status: AccountStatus,
    ) -> Result<User, AuthError> {
        let row = sqlx::query(&format!(
            "UPDATE users SET status = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AuthError::UserNotFound)?;

        user_from_row(&row)
    }

    /// Lists provider accounts, optionally narrowed to one status.
    pub async fn list_providers(
        &self,
        status: Option<AccountStatus>,
    ) -> Result<Vec<User>, AuthError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!(
                    "SELECT {USER_COLUMNS} FROM users \
                     WHERE role = 'provider' AND status = $1 ORDER BY created_at DESC"
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {USER_COLUMNS} FROM users \
                     WHERE role = 'provider' ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(user_from_row).collect()
    }

    /// Lists every account, newest first.
    pub async fn list_users(&self) -> Result<Vec<User>, AuthError> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(user_from_row).collect()
    }

    /// Collects the push tokens of every account that registered a device.
    pub async fn list_push_tokens(&self) -> Result<Vec<String>, AuthError> {
        let rows = sqlx::query("SELECT push_token FROM users WHERE push_token IS NOT NULL")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| row.get::<String, _>("push_token"))
            .collect())
    }
}

/// Maps a database row onto the user model, parsing the role and status
/// strings into their closed enums.
fn user_from_row(row: &PgRow) -> Result<User, AuthError> {
    let role_raw: String = row.get("role");
    let status_raw: String = row.get("status");

    let role = Role::parse(&role_raw)
        .ok_or_else(|| AuthError::Validation(format!("Unknown role in database: {}", role_raw)))?;
    let status = AccountStatus::parse(&status_raw).ok_or_else(|| {
        AuthError::Validation(format!("Unknown status in database: {}", status_raw))
    })?;

    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        role,
        interests: row.get("interests"),
        status,
        password_hash: row.get("password_hash"),
        reset_token: row.get("reset_token"),
        reset_token_expiry: row.get("reset_token_expiry"),
        push_token: row.get("push_token"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Generates a 32-character alphanumeric reset token.
fn generate_reset_token() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..32)
        .map(|_| {
            let chars = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
            chars[rng.random_range(0..chars.len())] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_tokens_are_long_and_distinct() {
        let a = generate_reset_token();
        let b = generate_reset_token();

        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
