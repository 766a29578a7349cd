// File: src/storage/sqlite/convert.rs

use crate::traits::NodeRecord;
use rusqlite::Row;

/// Convert a database row to NodeRecord
///
/// Expects the columns in `schema::NODE_COLUMNS` order.
pub fn row_to_node(row: &Row) -> rusqlite::Result<NodeRecord> {
    let created_at: i64 = row.get(5)?;

    Ok(NodeRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        lft: row.get(2)?,
        rgt: row.get(3)?,
        attachment: row.get(4)?,
        created_at: chrono::DateTime::from_timestamp_nanos(created_at),
    })
}
