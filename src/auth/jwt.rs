//! Bearer token service.
//!
//! Tokens are HS256 JWTs carrying `{ user: { id, role } }`. They are never
//! stored server-side; expiry is the only way a token stops working.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, models::user::Role};

/// Identity embedded in a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUser {
    pub id: Uuid,
    pub role: Role,
}

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: TokenUser,
    /// Issued-at, seconds since epoch
    pub iat: i64,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Sign a token for `id` that expires `ttl` from now.
    pub fn issue(&self, id: Uuid, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            user: TokenUser { id, role },
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    /// Check signature and expiry and return the embedded identity.
    pub fn verify(&self, token: &str) -> Result<TokenUser, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AppError::Unauthorized("Token is not valid".to_string())
        })?;

        Ok(data.claims.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let tokens = TokenService::new("test-secret-key-12345", 3600);
        let id = Uuid::new_v4();

        let token = tokens.issue(id, Role::Admin).unwrap();
        let user = tokens.verify(&token).unwrap();

        assert_eq!(user, TokenUser { id, role: Role::Admin });
    }

    #[test]
    fn token_expires_one_hour_after_issue() {
        let tokens = TokenService::new("secret", 3600);
        let token = tokens.issue(Uuid::new_v4(), Role::Author).unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.exp - data.claims.iat, 3600);
    }

    #[test]
    fn different_secret_is_rejected() {
        let a = TokenService::new("secret1", 3600);
        let b = TokenService::new("secret2", 3600);
        let token = a.issue(Uuid::new_v4(), Role::Author).unwrap();

        assert!(matches!(b.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well past the default 60s leeway
        let tokens = TokenService::new("secret", -3600);
        let token = tokens.issue(Uuid::new_v4(), Role::Author).unwrap();

        assert!(matches!(tokens.verify(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        let tokens = TokenService::new("secret", 3600);
        assert!(tokens.verify("invalid.token.here").is_err());
        assert!(tokens.verify("").is_err());
    }
}
