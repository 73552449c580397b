use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use panel_db::models::PackageRow;
use panel_types::api::{Ack, CreatePackageRequest, PackageResponse, UpdatePackageRequest};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;

fn to_response(row: PackageRow) -> PackageResponse {
    PackageResponse {
        id: row.id,
        name: row.name,
        channels: row.channels,
        duration: row.duration,
        price: row.price,
        status: row.status,
        created_at: row.created_at,
        subscribers: row.subscribers,
    }
}

/// GET /api/packages — every package with its derived active-subscriber
/// count.
pub async fn list_packages(
    State(state): State<AppState>,
) -> Result<Json<Vec<PackageResponse>>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || db.db.list_packages()).await?;
    Ok(Json(rows.into_iter().map(to_response).collect()))
}

pub async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PackageResponse>, ApiError> {
    let db = state.clone();
    let row = blocking(move || db.db.get_package(id))
        .await?
        .ok_or(ApiError::NotFound("Package"))?;
    Ok(Json(to_response(row)))
}

/// POST /api/packages — server assigns the id and the initial 'active'
/// status.
pub async fn create_package(
    State(state): State<AppState>,
    Json(req): Json<CreatePackageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = blocking(move || {
        db.db
            .create_package(&req.name, req.channels, req.duration, req.price)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(to_response(row))))
}

pub async fn update_package(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePackageRequest>,
) -> Result<Json<Ack>, ApiError> {
    let db = state.clone();
    let affected = blocking(move || {
        db.db.update_package(
            id,
            &req.name,
            req.channels,
            req.duration,
            req.price,
            &req.status,
        )
    })
    .await?;

    if affected == 0 {
        return Err(ApiError::NotFound("Package"));
    }
    Ok(Json(Ack::new("Package updated")))
}

pub async fn delete_package(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    let db = state.clone();
    let affected = blocking(move || db.db.delete_package(id)).await?;

    if affected == 0 {
        return Err(ApiError::NotFound("Package"));
    }
    Ok(Json(Ack::new("Package deleted")))
}
