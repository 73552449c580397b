use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use panel_api::auth::{AppState, AppStateInner, hash_password};
use panel_api::routes;
use panel_db::{Database, seed};

/// Startup configuration, read once from the environment and passed down
/// explicitly. Nothing here lives in process-wide globals.
struct Config {
    host: String,
    port: u16,
    jwt_secret: String,
    db_path: PathBuf,
    static_dir: PathBuf,
}

impl Config {
    fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("PANEL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3001".into())
            .parse()?;
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using an insecure default — override this in production");
            "change-me-in-production".into()
        });
        let db_path = std::env::var("PANEL_DB_PATH")
            .unwrap_or_else(|_| "panel.db".into())
            .into();
        let static_dir = std::env::var("PANEL_STATIC_DIR")
            .unwrap_or_else(|_| "public".into())
            .into();

        Ok(Self {
            host,
            port,
            jwt_secret,
            db_path,
            static_dir,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "panel=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db = Database::open(&config.db_path)?;
    seed::run(&db, hash_password)?;

    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret: config.jwt_secret.clone(),
    });

    // Front-end bundle with an index.html fallback for client-side routing.
    let static_files = ServeDir::new(&config.static_dir)
        .fallback(ServeFile::new(config.static_dir.join("index.html")));

    let app = routes::router(state)
        .fallback_service(static_files)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("IPTV panel listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
