//! Nested-set interval arithmetic and invariant verification
//!
//! A node owns the closed interval `[lft, rgt]`. Node A is an ancestor of node B iff
//! `A.lft < B.lft && B.rgt < A.rgt`. In a consistent tree of `n` nodes the bounds are
//! exactly `1..=2n`, the root spans `[1, 2n]`, and every interval width
//! `rgt - lft + 1` is twice the size of the subtree it encloses.

use crate::error::StorageError;
use crate::traits::NodeRecord;

/// Closed `[lft, rgt]` interval of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub lft: i64,
    pub rgt: i64,
}

impl Interval {
    pub const fn new(lft: i64, rgt: i64) -> Self {
        Self { lft, rgt }
    }

    /// Interval of a freshly seeded root
    pub const fn root() -> Self {
        Self::new(1, 2)
    }

    /// `rgt - lft + 1`
    pub fn width(&self) -> i64 {
        self.rgt - self.lft + 1
    }

    /// Number of nodes in the subtree (itself included)
    pub fn subtree_size(&self) -> i64 {
        self.width() / 2
    }

    /// Strict containment: `self` is an ancestor of `other`
    pub fn contains(&self, other: &Interval) -> bool {
        self.lft < other.lft && other.rgt < self.rgt
    }

    /// `self` lies entirely before or entirely after `other`
    pub fn is_disjoint(&self, other: &Interval) -> bool {
        self.rgt < other.lft || other.rgt < self.lft
    }

    /// Bound after which an insert below this node opens its gap
    ///
    /// The gap sits right before the closing bound, so the new node becomes the last child.
    pub fn insertion_anchor(&self) -> i64 {
        self.rgt - 1
    }

    /// Interval a new last child receives once the gap is open
    pub fn last_child_slot(&self) -> Interval {
        let anchor = self.insertion_anchor();
        Interval::new(anchor + 1, anchor + 2)
    }

    /// Shift this interval to make room for an insert at `anchor`
    pub fn shifted_for_insert(&self, anchor: i64) -> Interval {
        Interval::new(
            shift_bound_for_insert(self.lft, anchor),
            shift_bound_for_insert(self.rgt, anchor),
        )
    }

    /// Close the gap left behind by removing `removed`
    pub fn shifted_for_delete(&self, removed: &Interval) -> Interval {
        Interval::new(
            shift_bound_for_delete(self.lft, removed),
            shift_bound_for_delete(self.rgt, removed),
        )
    }
}

/// Bounds strictly after the anchor move two places right
pub fn shift_bound_for_insert(bound: i64, anchor: i64) -> i64 {
    if bound > anchor {
        bound + 2
    } else {
        bound
    }
}

/// Bounds strictly after the removed interval move left by its width
pub fn shift_bound_for_delete(bound: i64, removed: &Interval) -> i64 {
    if bound > removed.rgt {
        bound - removed.width()
    } else {
        bound
    }
}

/// Check every interval invariant over a full table dump
///
/// `nodes` may come in any order. Returns the first violation found as
/// `StorageError::Corruption`.
pub fn verify(nodes: &[NodeRecord]) -> Result<(), StorageError> {
    if nodes.is_empty() {
        return Err(StorageError::NotInitialized);
    }

    let mut sorted: Vec<&NodeRecord> = nodes.iter().collect();
    sorted.sort_by_key(|n| n.lft);

    for node in &sorted {
        if node.lft >= node.rgt {
            return Err(StorageError::Corruption(format!(
                "node {} has lft {} >= rgt {}",
                node.id, node.lft, node.rgt
            )));
        }
    }

    let total = sorted.len() as i64;
    let root = sorted[0];
    if root.lft != 1 || root.rgt != 2 * total {
        return Err(StorageError::Corruption(format!(
            "root {} spans [{}, {}], expected [1, {}]",
            root.id,
            root.lft,
            root.rgt,
            2 * total
        )));
    }

    let mut bounds: Vec<i64> = sorted.iter().flat_map(|n| [n.lft, n.rgt]).collect();
    bounds.sort_unstable();
    if let Some((pos, bound)) = bounds
        .iter()
        .enumerate()
        .find(|(pos, bound)| **bound != *pos as i64 + 1)
    {
        return Err(StorageError::Corruption(format!(
            "bound {} found where {} was expected",
            bound,
            pos + 1
        )));
    }

    // Walk in lft order keeping the chain of open ancestors; each node must close
    // before its innermost open ancestor does.
    let mut open: Vec<Interval> = Vec::new();
    for node in &sorted {
        let current = node.interval();
        while open.last().is_some_and(|top| top.rgt < current.lft) {
            open.pop();
        }
        if let Some(parent) = open.last() {
            if !parent.contains(&current) {
                return Err(StorageError::Corruption(format!(
                    "node {} [{}, {}] overlaps [{}, {}]",
                    node.id, current.lft, current.rgt, parent.lft, parent.rgt
                )));
            }
        }
        open.push(current);
    }

    Ok(())
}
