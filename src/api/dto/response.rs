//! Response DTOs

use serde::Serialize;

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,

    /// Number of stored nodes (healthy only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<u64>,

    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn healthy(nodes: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            nodes: Some(nodes),
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            nodes: None,
            error: Some(error.into()),
        }
    }
}
