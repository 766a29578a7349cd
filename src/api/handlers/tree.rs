//! Tree endpoint handler

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::api::state::AppState;
use crate::error::ServerError;
use crate::tree::TreeNode;

/// GET /getTree - Whole tree as nested JSON
pub async fn get_tree(State(state): State<Arc<AppState>>) -> Result<Json<TreeNode>, ServerError> {
    let tree = state.client.get_tree().await?;
    Ok(Json(tree))
}
