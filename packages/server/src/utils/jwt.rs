use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::auth::Role;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Sign(jsonwebtoken::errors::Error),
    #[error("invalid token: {0}")]
    Invalid(jsonwebtoken::errors::Error),
}

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Teacher id or student id
    pub role: Role,
    pub jti: String, // Distinguishes tokens issued within the same second
    pub iat: usize,
    pub exp: usize,
}

/// Sign a new session token for a user.
pub fn sign(user_id: &str, role: Role, secret: &str, ttl_hours: i64) -> Result<String, TokenError> {
    let now = Utc::now();
    let expiration = now + TimeDelta::hours(ttl_hours);

    let claims = Claims {
        sub: user_id.to_owned(),
        role,
        jti: uuid::Uuid::new_v4().to_string(),
        iat: now.timestamp().max(0) as usize,
        exp: expiration.timestamp().max(0) as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Sign)
}

/// Verify signature and expiry, and decode the claims.
pub fn verify(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(TokenError::Invalid)?;
    Ok(token_data.claims)
}
