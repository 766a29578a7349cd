//! Data Transfer Objects (DTOs)

mod request;
mod response;

pub use request::{parse_selector, NodeDataRequest, FALLBACK_TITLE};
pub use response::HealthResponse;
