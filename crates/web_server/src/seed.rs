//! Boot-time admin seeding from environment credentials.

use bcrypt::{DEFAULT_COST, hash};
use sqlx::PgPool;

/// Ensures the configured admin account exists.
///
/// Reads `ADMIN_EMAIL`, `ADMIN_PASSWORD`, and `ADMIN_NAME`; when the
/// first two are absent, seeding is skipped so development setups without
/// an admin still boot. Idempotent: an existing account is left untouched.
pub async fn seed_admin(pool: &PgPool) {
    let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        log::warn!("⚠️  ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin seed");
        return;
    };

    let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());
    let email = email.to_lowercase();

    let existing = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await;

    match existing {
        Ok(Some(_)) => {
            log::info!("🌱 Admin account {} already present", email);
        }
        Ok(None) => {
            let password_hash = match hash(&password, DEFAULT_COST) {
                Ok(hash) => hash,
                Err(e) => {
                    log::error!("❌ Failed to hash admin password: {}", e);
                    return;
                }
            };

            let result = sqlx::query(
                "INSERT INTO users (name, email, role, status, password_hash) \
                 VALUES ($1, $2, 'admin', 'approved', $3)",
            )
            .bind(&name)
            .bind(&email)
            .bind(&password_hash)
            .execute(pool)
            .await;

            match result {
                Ok(_) => log::info!("🌱 Seeded admin account {}", email),
                Err(e) => log::error!("❌ Failed to seed admin account: {}", e),
            }
        }
        Err(e) => {
            log::error!("❌ Failed to check for admin account: {}", e);
        }
    }
}
