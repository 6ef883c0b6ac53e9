use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: String,
    pub iat: i64,
    /// Absent on refresh tokens, which live until revoked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Issues and verifies the access/refresh token pair
#[derive(Clone)]
pub struct TokenManager {
    access_key: String,
    refresh_key: String,
    access_age_secs: i64,
}

impl TokenManager {
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            access_key: security.access_token_key.clone(),
            refresh_key: security.refresh_token_key.clone(),
            access_age_secs: security.access_token_age_secs as i64,
        }
    }

    pub fn generate_access_token(&self, user_id: &str) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: user_id.to_string(),
            iat: now,
            exp: Some(now + self.access_age_secs),
        };
        sign(&claims, &self.access_key)
    }

    pub fn generate_refresh_token(&self, user_id: &str) -> Result<String, JwtError> {
        let claims = Claims {
            id: user_id.to_string(),
            iat: Utc::now().timestamp(),
            exp: None,
        };
        sign(&claims, &self.refresh_key)
    }

    /// Verify an access token (signature and expiry) and return its claims
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        verify(token, &self.access_key, validation)
    }

    /// Verify a refresh token's signature and return its claims
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        verify(token, &self.refresh_key, validation)
    }
}

fn sign(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

fn verify(token: &str, secret: &str, validation: Validation) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}
