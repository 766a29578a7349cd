//! Router setup and configuration

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{any, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::api::handlers;
use crate::api::state::AppState;

/// Room for the non-file multipart fields on top of the upload limit
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.avatars.max_upload_bytes() + FORM_OVERHEAD_BYTES;
    let cors = build_cors_layer(&state.cors_origins);

    Router::new()
        .route("/getTree", get(handlers::get_tree))
        .route("/addNode", post(handlers::add_node))
        .route("/deleteNode/:selector", any(handlers::delete_node))
        .route("/getAvatar/:selector", get(handlers::get_avatar))
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the browser client; an empty list allows any origin
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let mut parsed = Vec::new();
    for origin in origins {
        match HeaderValue::from_str(origin) {
            Ok(value) => parsed.push(value),
            Err(err) => warn!("ignoring invalid CORS origin '{origin}': {err}"),
        }
    }
    layer.allow_origin(parsed)
}
