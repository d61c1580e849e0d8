use axum::Json;

use clicker_types::api::HealthResponse;

/// GET /api/health: liveness check, never touches the store.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}
