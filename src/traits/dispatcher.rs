//! Tree client trait and the in-process implementation used by the HTTP layer

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{ServerError, ServerResult};
use crate::traits::storage::{NodeId, NodeRecord};
use crate::tree::{TreeNode, TreeService};

/// Async view of the tree operations
///
/// Handlers only see this trait; the blocking store stays behind it.
#[async_trait]
pub trait TreeClient: Send + Sync {
    /// Assemble the whole tree
    async fn get_tree(&self) -> ServerResult<TreeNode>;

    /// Insert a new last child under `parent_id`
    ///
    /// `title` may be renamed by duplicate handling before it is stored.
    async fn add_node(
        &self,
        parent_id: NodeId,
        title: String,
        attachment: Option<String>,
    ) -> ServerResult<NodeId>;

    /// Delete a node and its subtree
    async fn delete_node(&self, id: NodeId) -> ServerResult<()>;

    /// Look up a single node
    async fn get_node(&self, id: NodeId) -> ServerResult<NodeRecord>;

    /// Attachment reference of a node
    async fn attachment(&self, id: NodeId) -> ServerResult<Option<String>>;

    /// Verify interval invariants, returning the node count
    async fn health_check(&self) -> ServerResult<u64>;
}

/// Runs every call on the blocking pool against a shared `TreeService`
#[derive(Clone)]
pub struct LocalTreeClient {
    service: Arc<TreeService>,
}

impl LocalTreeClient {
    pub fn new(service: Arc<TreeService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<TreeService> {
        &self.service
    }

    async fn run<T, F>(&self, op: F) -> ServerResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&TreeService) -> ServerResult<T> + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || op(&service))
            .await
            .map_err(|e| ServerError::Internal(format!("spawn_blocking failed: {}", e)))?
    }
}

#[async_trait]
impl TreeClient for LocalTreeClient {
    async fn get_tree(&self) -> ServerResult<TreeNode> {
        self.run(|service| service.get_tree()).await
    }

    async fn add_node(
        &self,
        parent_id: NodeId,
        title: String,
        attachment: Option<String>,
    ) -> ServerResult<NodeId> {
        self.run(move |service| service.insert(parent_id, &title, attachment))
            .await
    }

    async fn delete_node(&self, id: NodeId) -> ServerResult<()> {
        self.run(move |service| service.delete(id)).await
    }

    async fn get_node(&self, id: NodeId) -> ServerResult<NodeRecord> {
        self.run(move |service| service.get_node(id)).await
    }

    async fn attachment(&self, id: NodeId) -> ServerResult<Option<String>> {
        self.run(move |service| service.attachment(id)).await
    }

    async fn health_check(&self) -> ServerResult<u64> {
        self.run(|service| service.verify()).await
    }
}
