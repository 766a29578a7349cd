//! Server error types

use axum::http::StatusCode;
use thiserror::Error;

/// Main server error type
#[derive(Debug, Error)]
pub enum ServerError {
    // ========== Node Errors ==========
    /// Referenced node does not exist
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Store holds no root node (empty or uninitialized)
    #[error("root node not found - store is empty or not initialized")]
    RootNotFound,

    /// Structural operation that the tree cannot accept
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Title already present (reject policy only)
    #[error("duplicate title: {0}")]
    DuplicateTitle(String),

    // ========== Concurrency Errors ==========
    /// Mutation attempted while another one is in flight
    #[error("concurrency violation: {0}")]
    ConcurrencyViolation(String),

    // ========== Validation Errors ==========
    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unsupported content type
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    // ========== Storage Errors ==========
    /// Storage operation failed (NOT NotFound - that becomes NodeNotFound)
    #[error("storage error: {0}")]
    Storage(StorageError),

    // ========== Server Errors ==========
    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Interval invariants do not hold
    #[error("data corruption: {0}")]
    Corruption(String),

    /// Storage not initialized
    #[error("storage not initialized")]
    NotInitialized,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite database error
    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Server result type alias
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            ServerError::InvalidArgument(_) | ServerError::InvalidOperation(_) => {
                StatusCode::BAD_REQUEST
            }

            // 404 Not Found
            ServerError::NodeNotFound(_) | ServerError::RootNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            ServerError::DuplicateTitle(_) => StatusCode::CONFLICT,

            // 415 Unsupported Media Type
            ServerError::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            // 503 Service Unavailable
            ServerError::ConcurrencyViolation(_) => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            ServerError::Storage(_) | ServerError::Internal(_) | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code for API response
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::NodeNotFound(_) => "NODE_NOT_FOUND",
            ServerError::RootNotFound => "ROOT_NOT_FOUND",
            ServerError::InvalidOperation(_) => "INVALID_OPERATION",
            ServerError::DuplicateTitle(_) => "DUPLICATE_TITLE",
            ServerError::ConcurrencyViolation(_) => "CONCURRENCY_VIOLATION",
            ServerError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ServerError::UnsupportedContentType(_) => "UNSUPPORTED_CONTENT_TYPE",
            ServerError::Storage(_) => "STORAGE_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Check if error is recoverable (client can retry)
    ///
    /// Nested-set mutations are not idempotent, so retrying stays the caller's call.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ServerError::ConcurrencyViolation(_)
                | ServerError::Storage(StorageError::ConnectionFailed(_))
        )
    }
}

// Conversions from external errors

impl From<serde_json::Error> for ServerError {
    fn from(e: serde_json::Error) -> Self {
        ServerError::InvalidArgument(e.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::Storage(StorageError::Sqlite(e))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(e: std::io::Error) -> Self {
        ServerError::Storage(StorageError::Io(e))
    }
}

impl From<StorageError> for ServerError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(msg) => ServerError::NodeNotFound(msg),
            other => ServerError::Storage(other),
        }
    }
}
