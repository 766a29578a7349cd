//! Health check handler

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health - Verify the stored intervals
///
/// Returns 200 OK with the node count if the tree is consistent, 503 otherwise.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match state.client.health_check().await {
        Ok(nodes) => Ok(Json(HealthResponse::healthy(nodes))),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unhealthy(e.to_string())),
            ))
        }
    }
}
