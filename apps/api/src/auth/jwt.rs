//! JWT access tokens: HMAC-signed, carrying the user's email and id.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthError;
use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User email.
    pub sub: String,
    pub user_id: Uuid,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// Signing and verification keys plus the token lifetime.
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.secret_key,
            config.jwt_algorithm,
            Duration::minutes(config.access_token_expire_minutes),
        )
    }

    /// Issues a token for `email` / `user_id` expiring after the configured lifetime.
    pub fn issue(&self, email: &str, user_id: Uuid) -> Result<String, AuthError> {
        let claims = Claims {
            sub: email.to_string(),
            user_id,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        Ok(encode(&Header::new(self.algorithm), &claims, &self.encoding)?)
    }

    /// Checks signature, algorithm and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(self.algorithm))?;
        Ok(data.claims)
    }
}
