use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use super::types::{AuthError, Claims, Role, User};

/// Issues and verifies the bearer tokens used by the API.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl JwtService {
    /// Builds the service from `JWT_SECRET` and `JWT_EXPIRY_HOURS`.
    pub fn new() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-this-in-production".to_string());

        let expiry_hours = std::env::var("JWT_EXPIRY_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
            expiry_hours,
        }
    }

    /// Signs a bearer token for the given account.
    pub fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(self.expiry_hours))
            .expect("valid timestamp")
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            exp: expiration,
            iat: Utc::now().timestamp() as usize,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verifies signature and expiry, returning the embedded claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }

    /// Verifies a token and extracts the account id it was issued for.
    pub fn extract_user_id_from_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let claims = self.verify_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountStatus;
    use chrono::Utc;

    fn sample_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            phone: None,
            role,
            interests: vec![],
            status: AccountStatus::default_for(role),
            password_hash: "unused".to_string(),
            reset_token: None,
            reset_token_expiry: None,
            push_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip_preserves_identity_and_role() {
        let service = JwtService::new();
        let user = sample_user(Role::Provider);

        let token = service.generate_token(&user).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Provider);

        let extracted = service.extract_user_id_from_token(&token).unwrap();
        assert_eq!(extracted, user.id);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = JwtService::new();
        let user = sample_user(Role::Traveler);

        let mut token = service.generate_token(&user).unwrap();
        // Flip a character in the signature segment.
        let flipped = if token.ends_with('a') { 'b' } else { 'a' };
        token.pop();
        token.push(flipped);

        assert!(service.verify_token(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let service = JwtService::new();
        assert!(service.extract_user_id_from_token("not-a-jwt").is_err());
    }
}
