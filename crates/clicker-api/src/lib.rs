pub mod boosts;
pub mod error;
pub mod health;
pub mod users;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use clicker_db::Database;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

impl AppStateInner {
    pub fn new(db: Database) -> AppState {
        Arc::new(Self { db })
    }
}

/// The full handler set, mounted under `/api`, open to any origin.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .route("/register", post(users::register))
        .route("/click", post(users::click))
        .route("/claim-tokens", post(users::claim_tokens))
        .route("/user/{user_id}", get(users::get_user))
        .route("/buy-boost", post(boosts::buy_boost))
        .route("/active-boost/{user_id}", get(boosts::get_active_boost))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
}

/// Runs a store call off the async runtime.
///
/// Each call takes the connection lock on its own, so a handler issuing
/// several calls can interleave with other requests between them.
pub(crate) async fn run_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))?;
    Ok(result?)
}
