use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State};
use tracing::error;

use panel_db::Database;
use panel_types::api::{
    AdminInfo, AdminLoginResponse, LoginRequest, SubscriberInfo, UserLoginResponse,
};

use crate::blocking;
use crate::error::ApiError;
use crate::token::{admin_claims, issue_token, subscriber_claims};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

/// Hash a password with Argon2id and a fresh random salt. Any non-empty
/// string is accepted; strength validation is out of scope.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// POST /api/auth/login — admin login, 24 h token.
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let db = state.clone();
    let admin = blocking(move || {
        let admin = db
            .db
            .get_admin_by_username(&req.username)?
            .filter(|a| verify_password(&req.password, &a.password));
        Ok(admin)
    })
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    let token = issue_token(&state.jwt_secret, &admin_claims(admin.id, &admin.username))
        .map_err(|e| {
            error!("token issue failed: {:#}", e);
            ApiError::Internal
        })?;

    Ok(Json(AdminLoginResponse {
        token,
        admin: AdminInfo {
            id: admin.id,
            username: admin.username,
            email: admin.email,
        },
    }))
}

/// POST /api/auth/user-login — subscriber login, 7 day token. Also stamps
/// the subscriber's last_seen.
pub async fn user_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserLoginResponse>, ApiError> {
    let db = state.clone();
    let user = blocking(move || {
        let user = db
            .db
            .get_user_by_username(&req.username)?
            .filter(|u| verify_password(&req.password, &u.password));
        if let Some(u) = &user {
            db.db.touch_last_seen(u.id)?;
        }
        Ok(user)
    })
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    let token = issue_token(&state.jwt_secret, &subscriber_claims(user.id, &user.username))
        .map_err(|e| {
            error!("token issue failed: {:#}", e);
            ApiError::Internal
        })?;

    Ok(Json(UserLoginResponse {
        token,
        user: SubscriberInfo {
            id: user.id,
            username: user.username,
            package_id: user.package_id,
            status: user.status,
            expiry_date: user.expiry_date,
        },
    }))
}
