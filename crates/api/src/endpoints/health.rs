//! Liveness probe.

use axum::{Json, Router, extract::State, routing::get};
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use crate::middleware::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u64>,
}

/// Always answers; a failing database shows up in the `database` field.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let (database, user_count) = match state.user_service.count().await {
        Ok(count) => ("CONNECTED".to_string(), Some(count)),
        Err(e) => {
            warn!(error = %e, "Health probe could not reach the database");
            (format!("ERROR: {e}"), None)
        }
    };

    Json(HealthResponse {
        status: "UP",
        message: "Tangle Community App is running",
        timestamp: Utc::now().timestamp_millis(),
        database,
        user_count,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
}
