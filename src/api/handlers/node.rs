//! Node mutation handlers
//!
//! Both endpoints answer with the whole tree after the change.

use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use crate::api::dto::{parse_selector, NodeDataRequest};
use crate::api::state::AppState;
use crate::error::ServerError;
use crate::tree::TreeNode;

/// JSON bodies are tiny; anything bigger is not a node request
const JSON_BODY_LIMIT: usize = 64 * 1024;

/// Parsed POST /addNode form
#[derive(Default)]
struct AddNodeForm {
    data: Option<NodeDataRequest>,
    with_avatar: bool,
    upload: Option<(Vec<u8>, Option<String>)>,
}

/// POST /addNode - Insert a node as last child of `ParentID`
///
/// Dispatches to JSON or multipart handling based on Content-Type.
pub async fn add_node(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<TreeNode>, ServerError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let form = if content_type.starts_with("application/json") {
        read_json(request).await?
    } else if content_type.starts_with("multipart/form-data") {
        read_multipart(request).await?
    } else {
        return Err(ServerError::UnsupportedContentType(content_type));
    };

    let data = form
        .data
        .ok_or_else(|| ServerError::InvalidArgument("jsonData is required".into()))?;
    let title = data.normalized_title(state.max_title_len)?;

    let attachment = if form.with_avatar {
        let (bytes, upload_type) = form.upload.ok_or_else(|| {
            ServerError::InvalidArgument("uploadfile is required when filestatus is true".into())
        })?;
        Some(state.avatars.save(&bytes, upload_type.as_deref()).await?)
    } else {
        None
    };

    if let Err(e) = state
        .client
        .add_node(data.parent_id, title, attachment.clone())
        .await
    {
        if let Some(name) = attachment {
            if let Err(cleanup) = state.avatars.remove(&name).await {
                warn!(file = %name, error = %cleanup, "Failed to remove orphaned avatar");
            }
        }
        return Err(e);
    }

    let tree = state.client.get_tree().await?;
    Ok(Json(tree))
}

async fn read_json(request: Request) -> Result<AddNodeForm, ServerError> {
    let bytes = to_bytes(request.into_body(), JSON_BODY_LIMIT)
        .await
        .map_err(|e| ServerError::InvalidArgument(format!("Failed to read body: {}", e)))?;

    let data: NodeDataRequest = serde_json::from_slice(&bytes)
        .map_err(|e| ServerError::InvalidArgument(format!("Invalid JSON: {}", e)))?;

    Ok(AddNodeForm {
        data: Some(data),
        ..AddNodeForm::default()
    })
}

async fn read_multipart(request: Request) -> Result<AddNodeForm, ServerError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| ServerError::InvalidArgument(format!("invalid multipart payload: {}", e)))?;

    let mut form = AddNodeForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidArgument(format!("invalid multipart payload: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("jsonData") => {
                let text = field.text().await.map_err(|e| {
                    ServerError::InvalidArgument(format!("invalid jsonData field: {}", e))
                })?;
                form.data = Some(
                    serde_json::from_str(&text)
                        .map_err(|e| ServerError::InvalidArgument(format!("Invalid JSON: {}", e)))?,
                );
            }
            Some("filestatus") => {
                let text = field.text().await.map_err(|e| {
                    ServerError::InvalidArgument(format!("invalid filestatus field: {}", e))
                })?;
                form.with_avatar = text.trim() == "true";
            }
            Some("uploadfile") => {
                let upload_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    ServerError::InvalidArgument(format!("invalid uploadfile field: {}", e))
                })?;
                form.upload = Some((bytes.to_vec(), upload_type));
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }
    Ok(form)
}

/// /deleteNode/ID=<n> - Delete a node and its subtree (any method)
///
/// A malformed selector is a plain 404.
pub async fn delete_node(
    State(state): State<Arc<AppState>>,
    Path(selector): Path<String>,
) -> Result<Response, ServerError> {
    let Some(id) = parse_selector(&selector) else {
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    state.client.delete_node(id).await?;

    let tree = state.client.get_tree().await?;
    Ok(Json(tree).into_response())
}
