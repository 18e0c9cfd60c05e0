use std::{future::Future, net::SocketAddr, path::Path, time::Duration};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Config file when present, otherwise `SERVER_HOST` / `SERVER_PORT` /
/// `DATABASE_URL`. A config file that exists but does not parse is fatal.
fn load_config() -> Result<AppConfig, StartupError> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        return AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(format!("{path}: {e}")));
    }
    warn!(%path, "config file not found, using environment");
    AppConfig::from_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Router for an already migrated database.
pub fn app(db: DatabaseConnection, cfg: &AppConfig) -> Router {
    let timeout = Duration::from_secs(cfg.server.request_timeout_secs);
    routes::build_router(ServerState::new(db), build_cors(), timeout)
}

/// Serve `app` until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: load config, prepare the database and run the HTTP server
/// until Ctrl+C.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = load_config()?;

    if cfg.database.is_sqlite() {
        common::env::ensure_data_dir(&cfg.database.url).await?;
    }
    let db = models::db::connect_and_migrate(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, timeout_secs = cfg.server.request_timeout_secs, "question bank listening");

    serve(listener, app(db, &cfg), shutdown_signal()).await?;
    Ok(())
}
