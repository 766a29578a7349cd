//! Trait definitions for storage and the HTTP-facing tree client

pub mod dispatcher;
pub mod storage;

pub use dispatcher::{LocalTreeClient, TreeClient};
pub use storage::{NewNode, NodeId, NodeRecord, TreeStore};
