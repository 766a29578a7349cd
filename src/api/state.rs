//! Application state shared across HTTP handlers

use std::sync::Arc;

use crate::storage::AvatarStore;
use crate::traits::TreeClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Tree operations (blocking core behind an async client)
    pub client: Arc<dyn TreeClient>,

    /// Uploaded and default avatar files
    pub avatars: AvatarStore,

    /// Longest title accepted by POST /addNode
    pub max_title_len: usize,

    /// Allowed CORS origins (empty = any origin)
    pub cors_origins: Vec<String>,
}
