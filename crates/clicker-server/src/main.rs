mod config;

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use clicker_api::AppStateInner;
use clicker_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .init();

    // A store that fails to open is logged; the server still comes up and
    // every data endpoint answers 500.
    let opened = match &config.db_path {
        Some(path) => Database::open(path),
        None => Database::open_in_memory(),
    };
    let db = opened.unwrap_or_else(|e| {
        error!("Failed to open database: {:#}", e);
        Database::unavailable()
    });

    let state = AppStateInner::new(db);

    let app = clicker_api::router(state.clone()).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Clicker server listening on {} ({:?})", addr, config.environment);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = state.db.close() {
        warn!("Failed to close database: {:#}", e);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
