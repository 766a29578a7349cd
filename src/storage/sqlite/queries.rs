// File: src/storage/sqlite/queries.rs

use super::convert::row_to_node;
use super::schema::NODE_COLUMNS;
use super::store::SqliteStore;
use crate::error::{ServerError, ServerResult};
use crate::traits::{NodeId, NodeRecord};
use rusqlite::{params, Connection};

impl SqliteStore {
    pub(crate) fn get_root_impl(&self) -> ServerResult<NodeRecord> {
        let conn = self.get_conn()?;
        find_root(&conn)?.ok_or(ServerError::RootNotFound)
    }

    pub(crate) fn get_node_impl(&self, id: NodeId) -> ServerResult<NodeRecord> {
        let conn = self.get_conn()?;
        find_node(&conn, id)?.ok_or_else(|| ServerError::NodeNotFound(id.to_string()))
    }

    /// Immediate children: descendants with exactly two enclosing intervals
    /// (themselves and `node`) inside `node`'s range
    pub(crate) fn children_impl(&self, node: &NodeRecord) -> ServerResult<Vec<NodeRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT node.id, node.title, node.lft, node.rgt, node.attachment, node.created_at
             FROM nodes AS node
             JOIN nodes AS parent ON node.lft BETWEEN parent.lft AND parent.rgt
             WHERE node.lft > ?1 AND node.rgt < ?2
               AND parent.lft BETWEEN ?1 AND ?2
             GROUP BY node.id
             HAVING COUNT(parent.id) = 2
             ORDER BY node.lft",
        )?;

        let rows = stmt.query_map(params![node.lft, node.rgt], row_to_node)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub(crate) fn snapshot_impl(&self) -> ServerResult<Vec<NodeRecord>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {} FROM nodes ORDER BY lft", NODE_COLUMNS))?;

        let rows = stmt.query_map([], row_to_node)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub(crate) fn title_exists_impl(&self, title: &str) -> ServerResult<bool> {
        let conn = self.get_conn()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM nodes WHERE title = ?1)",
            params![title],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub(crate) fn node_count_impl(&self) -> ServerResult<u64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// Root row (lft = 1), if any
///
/// A missing table reads as "no root" so that `is_initialized()` works before
/// `initialize()`.
pub(crate) fn find_root(conn: &Connection) -> ServerResult<Option<NodeRecord>> {
    let sql = format!("SELECT {} FROM nodes WHERE lft = 1", NODE_COLUMNS);
    match conn.query_row(&sql, [], row_to_node) {
        Ok(node) => Ok(Some(node)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(rusqlite::Error::SqliteFailure(_, Some(msg))) if msg.contains("no such table") => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn find_node(conn: &Connection, id: NodeId) -> ServerResult<Option<NodeRecord>> {
    let sql = format!("SELECT {} FROM nodes WHERE id = ?1", NODE_COLUMNS);
    match conn.query_row(&sql, params![id], row_to_node) {
        Ok(node) => Ok(Some(node)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
