use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::token::verify_token;

/// Gate for protected routes: a missing or non-Bearer Authorization header is
/// 401, a bad signature or expired token is 403. On success the decoded
/// claims are attached to the request for downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)?;

    let claims = verify_token(&state.jwt_secret, token)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
