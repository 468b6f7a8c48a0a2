//! Rota Server - HTTP API for reviewer assignment
//!
//! Wires the SQLite store into a [`ReviewService`] and exposes it over axum.
//! The `rota` binary in this crate adds the command line front end.

pub mod api;

use rota_core::{Config, ReviewService};
use rota_db::{Database, DatabaseConfig, SqliteStore};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub use api::{router, ApiErr, AppState};

/// Open the database, apply migrations and build the service
pub async fn open_service(config: &Config) -> rota_db::Result<(Database, ReviewService<SqliteStore>)> {
    let db = Database::open(DatabaseConfig::from(config.database.clone())).await?;
    let service = ReviewService::new(db.store()).with_settings(&config.engine);
    Ok((db, service))
}

/// Serve the API on `listener` until `shutdown` fires
///
/// Cancelling `shutdown` stops accepting connections and cancels the
/// per-request tokens of in-flight operations, which roll back.
pub async fn serve(
    listener: TcpListener,
    service: ReviewService<SqliteStore>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let app = router(AppState::new(service, shutdown.clone()));

    info!(addr = %listener.local_addr()?, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
        })
        .await?;
    info!("server stopped");
    Ok(())
}
