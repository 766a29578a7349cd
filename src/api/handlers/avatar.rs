//! Avatar download handler

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::dto::parse_selector;
use crate::api::state::AppState;
use crate::error::ServerError;

/// GET /getAvatar/ID=<n> - Attachment bytes of a node
///
/// Nodes without an attachment get the default avatar.
pub async fn get_avatar(
    State(state): State<Arc<AppState>>,
    Path(selector): Path<String>,
) -> Result<Response, ServerError> {
    let Some(id) = parse_selector(&selector) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    let attachment = state.client.attachment(id).await?;
    let (bytes, content_type) = state.avatars.read(attachment.as_deref()).await?;

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
