use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::error::EngineError;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Readiness includes a database round trip.
pub async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, EngineError> {
    state.repo.ping().await?;
    Ok(Json(serde_json::json!({"status": "ready"})))
}
