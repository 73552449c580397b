use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};

use panel_db::models::UserRow;
use panel_types::api::{Ack, CreateUserRequest, UpdateUserRequest, UserResponse};

use crate::auth::{AppState, hash_password};
use crate::blocking;
use crate::error::ApiError;

/// Fallback subscription length when the package lookup fails or the
/// package has no duration set.
const DEFAULT_DURATION_DAYS: i64 = 30;

fn to_response(row: UserRow) -> UserResponse {
    UserResponse {
        id: row.id,
        username: row.username,
        package_id: row.package_id,
        package_name: row.package_name,
        device: row.device,
        status: row.status,
        expiry_date: row.expiry_date,
        last_seen: row.last_seen,
        created_at: row.created_at,
    }
}

/// GET /api/users — subscribers decorated with their package's display
/// name (null when the reference dangles).
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || db.db.list_users()).await?;
    Ok(Json(rows.into_iter().map(to_response).collect()))
}

/// POST /api/users — hashes the password, resolves the package duration to
/// compute the expiry date, and forces initial status 'active'.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = blocking(move || {
        let password_hash = hash_password(&req.password)?;

        let duration = match req.package_id {
            Some(package_id) => db
                .db
                .package_duration(package_id)?
                .unwrap_or(DEFAULT_DURATION_DAYS),
            None => DEFAULT_DURATION_DAYS,
        };
        let expiry = (Utc::now() + Duration::days(duration))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        db.db.create_user(
            &req.username,
            &password_hash,
            req.package_id,
            req.device.as_deref(),
            &expiry,
        )
    })
    .await?;

    Ok((StatusCode::CREATED, Json(to_response(row))))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Ack>, ApiError> {
    let db = state.clone();
    let affected = blocking(move || {
        db.db
            .update_user(id, req.package_id, req.device.as_deref(), &req.status)
    })
    .await?;

    if affected == 0 {
        return Err(ApiError::NotFound("User"));
    }
    Ok(Json(Ack::new("User updated")))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    let db = state.clone();
    let affected = blocking(move || db.db.delete_user(id)).await?;

    if affected == 0 {
        return Err(ApiError::NotFound("User"));
    }
    Ok(Json(Ack::new("User deleted")))
}
