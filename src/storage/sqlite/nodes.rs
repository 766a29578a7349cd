// File: src/storage/sqlite/nodes.rs

use super::queries;
use super::store::SqliteStore;
use crate::error::{ServerError, ServerResult, StorageError};
use crate::traits::{NewNode, NodeId};
use rusqlite::{params, TransactionBehavior};
use tracing::debug;

impl SqliteStore {
    /// Open a two-slot gap before the parent's closing bound and place the node there
    pub(crate) fn insert_impl(&self, node: NewNode) -> ServerResult<NodeId> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let parent = queries::find_node(&tx, node.parent_id)?
            .ok_or_else(|| ServerError::NodeNotFound(node.parent_id.to_string()))?
            .interval();
        let anchor = parent.insertion_anchor();
        let slot = parent.last_child_slot();

        // rgt first so that lft < rgt holds after every row update
        tx.execute(
            "UPDATE nodes SET rgt = rgt + 2 WHERE rgt > ?1",
            params![anchor],
        )?;
        tx.execute(
            "UPDATE nodes SET lft = lft + 2 WHERE lft > ?1",
            params![anchor],
        )?;

        let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
        tx.execute(
            "INSERT INTO nodes (title, lft, rgt, attachment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![node.title, slot.lft, slot.rgt, node.attachment, now],
        )?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        debug!(id, lft = slot.lft, rgt = slot.rgt, "Inserted node row");
        Ok(id)
    }

    /// Remove the node's whole interval and close the gap it leaves
    pub(crate) fn delete_impl(&self, id: NodeId) -> ServerResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let removed = queries::find_node(&tx, id)?
            .ok_or_else(|| ServerError::NodeNotFound(id.to_string()))?
            .interval();
        if removed.lft == 1 {
            return Err(ServerError::InvalidOperation(
                "must not delete root node".into(),
            ));
        }

        let deleted = tx.execute(
            "DELETE FROM nodes WHERE lft BETWEEN ?1 AND ?2",
            params![removed.lft, removed.rgt],
        )? as i64;
        if deleted == 0 {
            return Err(ServerError::NodeNotFound(id.to_string()));
        }
        if deleted != removed.subtree_size() {
            // Dropping tx rolls the delete back
            return Err(StorageError::Corruption(format!(
                "{} rows lie under node {}, interval encloses {}",
                deleted,
                id,
                removed.subtree_size()
            ))
            .into());
        }

        // lft first so that lft < rgt holds after every row update
        let width = removed.width();
        tx.execute(
            "UPDATE nodes SET lft = lft - ?1 WHERE lft > ?2",
            params![width, removed.rgt],
        )?;
        tx.execute(
            "UPDATE nodes SET rgt = rgt - ?1 WHERE rgt > ?2",
            params![width, removed.rgt],
        )?;

        tx.commit()?;
        debug!(id, removed = deleted, "Deleted subtree rows");
        Ok(())
    }
}
