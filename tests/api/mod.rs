//! API integration tests
//!
//! Tests for HTTP endpoints:
//! - GET /getTree
//! - POST /addNode (JSON and multipart)
//! - /deleteNode/ID=<n>
//! - GET /getAvatar/ID=<n>
//! - GET /health

pub mod avatar_test;
pub mod health_test;
pub mod tree_test;
