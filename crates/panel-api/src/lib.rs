pub mod auth;
pub mod channels;
pub mod dashboard;
pub mod error;
pub mod middleware;
pub mod packages;
pub mod routes;
pub mod token;
pub mod users;

use error::ApiError;
use tracing::error;

/// Run a blocking closure (argon2 hashing, rusqlite calls) off the async
/// runtime and fold both the join error and the closure error into the API
/// error taxonomy.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(ApiError::from)
}
