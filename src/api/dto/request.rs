//! Request DTOs

use serde::Deserialize;

use crate::error::{ServerError, ServerResult};
use crate::traits::NodeId;

/// Title used when the requested one is empty or not alphanumeric
pub const FALLBACK_TITLE: &str = "Node";

/// `jsonData` part of POST /addNode (or the whole JSON body)
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDataRequest {
    /// Node that receives the new node as its last child
    #[serde(rename = "ParentID")]
    pub parent_id: NodeId,

    /// Requested title
    #[serde(rename = "Title", default)]
    pub title: String,
}

impl NodeDataRequest {
    /// Title to hand to the core
    ///
    /// Empty or non-alphanumeric titles become `"Node"`; valid but over-long ones are
    /// rejected.
    pub fn normalized_title(&self, max_len: usize) -> ServerResult<String> {
        let valid = !self.title.is_empty() && self.title.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Ok(FALLBACK_TITLE.to_string());
        }

        if self.title.chars().count() > max_len {
            return Err(ServerError::InvalidArgument(format!(
                "title longer than {} characters",
                max_len
            )));
        }
        Ok(self.title.clone())
    }
}

/// Parse a `ID=<n>` path selector
pub fn parse_selector(selector: &str) -> Option<NodeId> {
    let digits = selector.strip_prefix("ID=")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
