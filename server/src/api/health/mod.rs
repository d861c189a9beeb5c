//! Health check routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /health | GET | none |
//! | /api/health/database | GET | none |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use shared::error::AppResult;

/// Public health routes
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/health/database", get(database_health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
}

/// GET /health - liveness probe
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    })
}

#[derive(Serialize)]
pub struct DatabaseHealthResponse {
    status: &'static str,
}

/// GET /api/health/database - connectivity probe
pub async fn database_health(
    State(state): State<ServerState>,
) -> AppResult<Json<DatabaseHealthResponse>> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map_err(|e| shared::AppError::database(e.to_string()))?;
    Ok(Json(DatabaseHealthResponse { status: "ok" }))
}
