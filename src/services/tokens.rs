use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Issues and checks the short-lived access token and the long-lived
/// refresh token. The two use separate secrets, so a refresh token never
/// validates as an access token.
#[derive(Clone)]
pub struct TokenService {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        Self {
            access_secret: config.jwt_access_secret.clone(),
            refresh_secret: config.jwt_refresh_secret.clone(),
            access_ttl: Duration::minutes(config.access_token_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_token_ttl_days),
        }
    }

    pub fn generate_access_token(&self, user_id: i32) -> Result<String> {
        Self::sign(user_id, &self.access_secret, self.access_ttl)
    }

    pub fn generate_refresh_token(&self, user_id: i32) -> Result<String> {
        Self::sign(user_id, &self.refresh_secret, self.refresh_ttl)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<i32> {
        Self::verify(token, &self.access_secret)
            .map_err(|_| AppError::Authentication("Invalid or expired access token".to_string()))
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<i32> {
        Self::verify(token, &self.refresh_secret)
            .map_err(|_| AppError::Forbidden("Invalid refresh token".to_string()))
    }

    fn sign(user_id: i32, secret: &str, ttl: Duration) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + ttl).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    fn verify(token: &str, secret: &str) -> std::result::Result<i32, ()> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| ())?;

        data.claims.sub.parse().map_err(|_| ())
    }
}
