//! # routes::health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use crate::state::SharedState;

/// GET /health: liveness plus a database round-trip
pub async fn health_check(State(state): State<SharedState>) -> impl IntoResponse {
    let db_ok = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => true,
        Err(e) => {
            error!(error = %e, "health check: database unreachable");
            false
        }
    };
    let sessions = state.sessions.len().await;

    let status = if db_ok { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (
        status,
        Json(json!({
            "ok":       db_ok,
            "database": db_ok,
            "sessions": sessions,
        })),
    )
}
