//! Reconstruction of the in-memory tree from interval data

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};
use crate::traits::{NodeId, NodeRecord, TreeStore};

/// Assembled node as exchanged with clients
///
/// Field names match the wire format: `ID`, `Title`, `ChildNodes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(rename = "ID")]
    pub id: NodeId,

    #[serde(rename = "Title")]
    pub title: String,

    /// Immediate children, left to right
    #[serde(rename = "ChildNodes", default)]
    pub child_nodes: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(record: &NodeRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            child_nodes: Vec::new(),
        }
    }

    /// Nodes in this subtree (itself included)
    pub fn len(&self) -> usize {
        1 + self.child_nodes.iter().map(TreeNode::len).sum::<usize>()
    }

    /// Always false: a tree node counts itself
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Depth-first search by id
    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.child_nodes.iter().find_map(|child| child.find(id))
    }
}

/// How a tree is rebuilt from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssemblyMode {
    /// One descendants query per node, recursing from the root
    #[default]
    Descendants,
    /// One full scan ordered by lft, folded with a stack
    Snapshot,
}

impl std::str::FromStr for AssemblyMode {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "descendants" => Ok(Self::Descendants),
            "snapshot" => Ok(Self::Snapshot),
            other => Err(ServerError::Config(format!(
                "unknown assembly mode '{}' (expected 'descendants' or 'snapshot')",
                other
            ))),
        }
    }
}

/// Builds `TreeNode`s from a `TreeStore`
///
/// Both modes yield the same shape and ordering. Callers must hold a read permit for
/// the whole call; each build re-derives the tree from current interval state.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeAssembler {
    mode: AssemblyMode,
}

impl TreeAssembler {
    pub fn new(mode: AssemblyMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> AssemblyMode {
        self.mode
    }

    /// Assemble the whole tree under the root
    pub fn build(&self, store: &dyn TreeStore) -> ServerResult<TreeNode> {
        match self.mode {
            AssemblyMode::Descendants => {
                let root = store.get_root()?;
                Self::descend(store, &root)
            }
            AssemblyMode::Snapshot => Self::from_snapshot(store.snapshot()?),
        }
    }

    fn descend(store: &dyn TreeStore, record: &NodeRecord) -> ServerResult<TreeNode> {
        let mut node = TreeNode::leaf(record);
        for child in store.children(record)? {
            node.child_nodes.push(Self::descend(store, &child)?);
        }
        Ok(node)
    }

    /// Fold a full table dump into a tree
    ///
    /// `records` must be ordered by ascending lft; the first one is the root.
    pub fn from_snapshot(records: Vec<NodeRecord>) -> ServerResult<TreeNode> {
        let mut records = records.into_iter();
        let root = match records.next() {
            Some(r) if r.lft == 1 => r,
            _ => return Err(ServerError::RootNotFound),
        };

        // Open ancestors with their closing bounds; the root stays at the bottom.
        let mut open: Vec<(TreeNode, i64)> = vec![(TreeNode::leaf(&root), root.rgt)];

        for record in records {
            while open.len() > 1 && open.last().is_some_and(|(_, rgt)| *rgt < record.lft) {
                Self::close_last(&mut open);
            }
            open.push((TreeNode::leaf(&record), record.rgt));
        }

        while open.len() > 1 {
            Self::close_last(&mut open);
        }

        open.pop()
            .map(|(node, _)| node)
            .ok_or(ServerError::RootNotFound)
    }

    fn close_last(open: &mut Vec<(TreeNode, i64)>) {
        if let Some((done, _)) = open.pop() {
            if let Some((parent, _)) = open.last_mut() {
                parent.child_nodes.push(done);
            }
        }
    }
}
