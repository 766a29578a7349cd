//! Tree operations funnelled through the mutation guard

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::TreeConfig;
use crate::error::{ServerError, ServerResult};
use crate::traits::{NewNode, NodeId, NodeRecord, TreeStore};
use crate::tree::assembler::{TreeAssembler, TreeNode};
use crate::tree::guard::MutationGuard;
use crate::tree::identity::IdentityResolver;
use crate::tree::interval;

/// Owns one store together with the guard, resolver and assembler that operate on it
///
/// Every structural mutation runs inside the guard's exclusive section; every read
/// that spans more than one store call runs inside its shared section.
pub struct TreeService {
    store: Arc<dyn TreeStore>,
    guard: MutationGuard,
    resolver: IdentityResolver,
    assembler: TreeAssembler,
    max_title_len: usize,
}

impl TreeService {
    pub fn new(store: Arc<dyn TreeStore>, config: &TreeConfig) -> Self {
        Self {
            store,
            guard: MutationGuard::new(config.lock_timeout),
            resolver: IdentityResolver::new(config.duplicate_titles),
            assembler: TreeAssembler::new(config.assembly),
            max_title_len: config.max_title_len,
        }
    }

    pub fn store(&self) -> &Arc<dyn TreeStore> {
        &self.store
    }

    pub fn guard(&self) -> &MutationGuard {
        &self.guard
    }

    /// Insert a new last child under `parent_id`, returning its id
    ///
    /// The title may be rewritten by the identity resolver before it is stored. The
    /// stored title, suffix included, never exceeds `max_title_len` characters.
    pub fn insert(
        &self,
        parent_id: NodeId,
        title: &str,
        attachment: Option<String>,
    ) -> ServerResult<NodeId> {
        let _permit = self.guard.mutate()?;

        // Fail on a missing parent before the resolver consumes a counter value
        self.store.get_node(parent_id)?;
        let title = self.resolver.resolve(self.store.as_ref(), title)?;
        if title.chars().count() > self.max_title_len {
            return Err(ServerError::InvalidArgument(format!(
                "title '{}' longer than {} characters",
                title, self.max_title_len
            )));
        }

        let id = self.store.insert(NewNode {
            parent_id,
            title: title.clone(),
            attachment,
        })?;

        info!(id, parent_id, title = %title, "Node inserted");
        Ok(id)
    }

    /// Delete a node and its whole subtree
    pub fn delete(&self, id: NodeId) -> ServerResult<()> {
        let _permit = self.guard.mutate()?;
        self.store.delete(id)?;
        info!(id, "Subtree deleted");
        Ok(())
    }

    /// Assemble the current tree
    pub fn get_tree(&self) -> ServerResult<TreeNode> {
        let _permit = self.guard.read()?;
        let tree = self.assembler.build(self.store.as_ref())?;
        debug!(nodes = tree.len(), "Tree assembled");
        Ok(tree)
    }

    /// Look up a single node
    pub fn get_node(&self, id: NodeId) -> ServerResult<NodeRecord> {
        let _permit = self.guard.read()?;
        self.store.get_node(id)
    }

    /// Attachment reference of a node (`None` means the default avatar)
    pub fn attachment(&self, id: NodeId) -> ServerResult<Option<String>> {
        Ok(self.get_node(id)?.attachment)
    }

    /// Check interval invariants over the whole table, returning the node count
    pub fn verify(&self) -> ServerResult<u64> {
        let _permit = self.guard.read()?;
        let nodes = self.store.snapshot()?;
        interval::verify(&nodes)?;
        Ok(nodes.len() as u64)
    }
}
