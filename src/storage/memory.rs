//! In-memory nested-set table
//!
//! Same interval semantics as the SQLite backend, kept in a `Vec` behind a mutex.
//! Used for tests and ephemeral servers.

use chrono::Utc;
use parking_lot::Mutex;

use crate::error::{ServerError, ServerResult, StorageError};
use crate::traits::{NewNode, NodeId, NodeRecord, TreeStore};
use crate::tree::interval::Interval;

#[derive(Debug)]
struct Table {
    nodes: Vec<NodeRecord>,
    next_id: NodeId,
}

impl Table {
    fn find(&self, id: NodeId) -> ServerResult<&NodeRecord> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| ServerError::NodeNotFound(id.to_string()))
    }

    fn root(&self) -> ServerResult<&NodeRecord> {
        self.nodes
            .iter()
            .find(|n| n.lft == 1)
            .ok_or(ServerError::RootNotFound)
    }

    fn set_interval(node: &mut NodeRecord, interval: Interval) {
        node.lft = interval.lft;
        node.rgt = interval.rgt;
    }
}

/// `TreeStore` backed by process memory
#[derive(Debug)]
pub struct MemoryStore {
    table: Mutex<Table>,
}

impl MemoryStore {
    /// Store seeded with a root titled `root_title`
    pub fn new(root_title: &str) -> Self {
        let store = Self::empty();
        store.seed_root(root_title);
        store
    }

    /// Store without any node (not initialized)
    pub fn empty() -> Self {
        Self {
            table: Mutex::new(Table {
                nodes: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Seed a root if the table is empty
    pub fn seed_root(&self, root_title: &str) {
        let mut table = self.table.lock();
        if !table.nodes.is_empty() {
            return;
        }
        let id = table.next_id;
        table.next_id += 1;
        let root = Interval::root();
        table.nodes.push(NodeRecord {
            id,
            title: root_title.to_string(),
            lft: root.lft,
            rgt: root.rgt,
            attachment: None,
            created_at: Utc::now(),
        });
    }
}

impl TreeStore for MemoryStore {
    fn insert(&self, node: NewNode) -> ServerResult<NodeId> {
        let mut table = self.table.lock();

        let parent = table.find(node.parent_id)?.interval();
        let anchor = parent.insertion_anchor();
        let slot = parent.last_child_slot();

        for existing in table.nodes.iter_mut() {
            let shifted = existing.interval().shifted_for_insert(anchor);
            Table::set_interval(existing, shifted);
        }

        let id = table.next_id;
        table.next_id += 1;
        table.nodes.push(NodeRecord {
            id,
            title: node.title,
            lft: slot.lft,
            rgt: slot.rgt,
            attachment: node.attachment,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn delete(&self, id: NodeId) -> ServerResult<()> {
        let mut table = self.table.lock();

        if table.root()?.id == id {
            return Err(ServerError::InvalidOperation(
                "must not delete root node".into(),
            ));
        }
        let removed = table.find(id)?.interval();

        let in_range = |n: &NodeRecord| n.lft >= removed.lft && n.lft <= removed.rgt;
        let doomed = table.nodes.iter().filter(|&n| in_range(n)).count() as i64;
        if doomed != removed.subtree_size() {
            return Err(StorageError::Corruption(format!(
                "{} nodes lie under {}, interval encloses {}",
                doomed,
                id,
                removed.subtree_size()
            ))
            .into());
        }
        table.nodes.retain(|n| !in_range(n));

        for existing in table.nodes.iter_mut() {
            let shifted = existing.interval().shifted_for_delete(&removed);
            Table::set_interval(existing, shifted);
        }
        Ok(())
    }

    fn get_root(&self) -> ServerResult<NodeRecord> {
        self.table.lock().root().cloned()
    }

    fn get_node(&self, id: NodeId) -> ServerResult<NodeRecord> {
        self.table.lock().find(id).cloned()
    }

    fn children(&self, node: &NodeRecord) -> ServerResult<Vec<NodeRecord>> {
        let outer = node.interval();
        let mut descendants: Vec<NodeRecord> = self
            .table
            .lock()
            .nodes
            .iter()
            .filter(|n| outer.contains(&n.interval()))
            .cloned()
            .collect();
        descendants.sort_by_key(|n| n.lft);

        // In lft order, a descendant is a direct child iff it starts after the
        // previous direct child closed.
        let mut children = Vec::new();
        let mut closed_at = outer.lft;
        for candidate in descendants {
            if candidate.lft > closed_at {
                closed_at = candidate.rgt;
                children.push(candidate);
            }
        }
        Ok(children)
    }

    fn snapshot(&self) -> ServerResult<Vec<NodeRecord>> {
        let mut nodes = self.table.lock().nodes.clone();
        nodes.sort_by_key(|n| n.lft);
        Ok(nodes)
    }

    fn title_exists(&self, title: &str) -> ServerResult<bool> {
        Ok(self.table.lock().nodes.iter().any(|n| n.title == title))
    }

    fn node_count(&self) -> ServerResult<u64> {
        Ok(self.table.lock().nodes.len() as u64)
    }
}
