use axum::{
    Router,
    handler::Handler,
    middleware,
    routing::{get, post, put},
};

use crate::auth::{self, AppState};
use crate::channels;
use crate::dashboard;
use crate::middleware::require_auth;
use crate::packages;
use crate::users;

/// Assemble the API router. Public: the two login routes and the
/// channel-lineup fetch consumed by unauthenticated player apps. Everything
/// else sits behind the bearer-token guard.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/login", post(auth::admin_login))
        .route("/api/auth/user-login", post(auth::user_login))
        .with_state(state.clone());

    // GET shares its path with the guarded DELETE, so the guard is applied
    // per handler here rather than on the whole router.
    let channel_routes = Router::new()
        .route(
            "/api/channels/{id}",
            get(channels::list_by_package).delete(
                channels::delete_channel
                    .layer(middleware::from_fn_with_state(state.clone(), require_auth)),
            ),
        )
        .route(
            "/api/channels",
            post(
                channels::create_channel
                    .layer(middleware::from_fn_with_state(state.clone(), require_auth)),
            ),
        )
        .with_state(state.clone());

    let protected = Router::new()
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/dashboard/activity", get(dashboard::activity))
        .route(
            "/api/packages",
            get(packages::list_packages).post(packages::create_package),
        )
        .route(
            "/api/packages/{id}",
            get(packages::get_package)
                .put(packages::update_package)
                .delete(packages::delete_package),
        )
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public).merge(channel_routes).merge(protected)
}
