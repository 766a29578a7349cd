//! Nested-set storage trait definition

use chrono::{DateTime, Utc};

use crate::error::ServerResult;
use crate::tree::interval::Interval;

/// Node identifier (monotonically assigned by the store)
pub type NodeId = i64;

/// A stored node with its interval bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// Unique identifier
    pub id: NodeId,

    /// Display title (not guaranteed unique)
    pub title: String,

    /// Left bound
    pub lft: i64,

    /// Right bound
    pub rgt: i64,

    /// Opaque attachment reference (avatar file name)
    pub attachment: Option<String>,

    /// When the node was inserted
    pub created_at: DateTime<Utc>,
}

impl NodeRecord {
    /// Interval spanned by this node
    pub fn interval(&self) -> Interval {
        Interval::new(self.lft, self.rgt)
    }
}

/// Parameters for inserting a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    /// Node that receives the new node as its last child
    pub parent_id: NodeId,

    /// Title as stored (already resolved against duplicates)
    pub title: String,

    /// Optional attachment reference
    pub attachment: Option<String>,
}

impl NewNode {
    pub fn new(parent_id: NodeId, title: impl Into<String>) -> Self {
        Self {
            parent_id,
            title: title.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachment = Some(attachment.into());
        self
    }
}

/// Interval-encoded tree table
///
/// Every method is synchronous and blocks until the backend answers. Mutations are
/// atomic: either every interval shift plus the structural change commits, or none
/// of it does. Callers serialize mutations through `MutationGuard`; the store itself
/// only guarantees atomicity.
pub trait TreeStore: Send + Sync + 'static {
    /// Insert `node` as the last child of `node.parent_id`
    ///
    /// # Errors
    /// * `NodeNotFound` - parent does not exist (no interval is altered)
    /// * `Storage` - backend failure (nothing committed)
    fn insert(&self, node: NewNode) -> ServerResult<NodeId>;

    /// Delete a node together with its whole subtree
    ///
    /// # Errors
    /// * `InvalidOperation` - `id` is the root
    /// * `NodeNotFound` - no node with `id`
    fn delete(&self, id: NodeId) -> ServerResult<()>;

    /// Designated root (lft = 1)
    fn get_root(&self) -> ServerResult<NodeRecord>;

    /// Look up a single node
    fn get_node(&self, id: NodeId) -> ServerResult<NodeRecord>;

    /// Immediate children of `node`, ordered by ascending lft
    fn children(&self, node: &NodeRecord) -> ServerResult<Vec<NodeRecord>>;

    /// Every node ordered by ascending lft
    fn snapshot(&self) -> ServerResult<Vec<NodeRecord>>;

    /// Whether any node carries exactly `title`
    fn title_exists(&self, title: &str) -> ServerResult<bool>;

    /// Total number of stored nodes
    fn node_count(&self) -> ServerResult<u64>;

    /// Check if storage holds a root
    fn is_initialized(&self) -> bool {
        self.get_root().is_ok()
    }
}
