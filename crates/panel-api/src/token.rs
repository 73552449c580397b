use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use panel_types::api::Claims;

use crate::error::ApiError;

/// Admins re-authenticate daily; subscriber devices stay logged in for a
/// week. Tokens are stateless, so revocation before natural expiry is not
/// possible.
const ADMIN_TOKEN_HOURS: i64 = 24;
const USER_TOKEN_DAYS: i64 = 7;

pub fn admin_claims(id: i64, username: &str) -> Claims {
    Claims {
        sub: id,
        username: username.to_string(),
        kind: None,
        exp: (Utc::now() + Duration::hours(ADMIN_TOKEN_HOURS)).timestamp() as usize,
    }
}

pub fn subscriber_claims(id: i64, username: &str) -> Claims {
    Claims {
        sub: id,
        username: username.to_string(),
        kind: Some("user".to_string()),
        exp: (Utc::now() + Duration::days(USER_TOKEN_DAYS)).timestamp() as usize,
    }
}

pub fn issue_token(secret: &str, claims: &Claims) -> anyhow::Result<String> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::InvalidToken)
}
