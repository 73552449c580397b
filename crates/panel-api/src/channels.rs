use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use panel_db::models::ChannelRow;
use panel_types::api::{Ack, ChannelResponse, CreateChannelRequest};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;

fn to_response(row: ChannelRow) -> ChannelResponse {
    ChannelResponse {
        id: row.id,
        name: row.name,
        url: row.url,
        logo: row.logo,
        category: row.category,
        package_id: row.package_id,
    }
}

/// GET /api/channels/{id} — channel list for a package. Deliberately
/// unauthenticated: player apps fetch their lineup without a panel token.
pub async fn list_by_package(
    State(state): State<AppState>,
    Path(package_id): Path<i64>,
) -> Result<Json<Vec<ChannelResponse>>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || db.db.channels_by_package(package_id)).await?;
    Ok(Json(rows.into_iter().map(to_response).collect()))
}

pub async fn create_channel(
    State(state): State<AppState>,
    Json(req): Json<CreateChannelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let row = blocking(move || {
        db.db.create_channel(
            &req.name,
            req.url.as_deref(),
            req.logo.as_deref(),
            req.category.as_deref(),
            req.package_id,
        )
    })
    .await?;
    Ok((StatusCode::CREATED, Json(to_response(row))))
}

pub async fn delete_channel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Ack>, ApiError> {
    let db = state.clone();
    let affected = blocking(move || db.db.delete_channel(id)).await?;

    if affected == 0 {
        return Err(ApiError::NotFound("Channel"));
    }
    Ok(Json(Ack::new("Channel deleted")))
}
