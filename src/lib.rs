//! nested-tree-server library exports (for testing)

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod traits;
pub mod tree;

// Re-exports
pub use error::{ServerError, ServerResult};
pub use traits::{LocalTreeClient, NewNode, NodeId, NodeRecord, TreeClient, TreeStore};
pub use tree::{TreeNode, TreeService};

#[cfg(feature = "sqlite")]
pub use storage::SqliteStore;
