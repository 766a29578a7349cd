// File: src/storage/sqlite/schema.rs

use crate::error::ServerResult;
use rusqlite::Connection;

/// Create all tables (idempotent)
pub fn create_tables(conn: &Connection) -> ServerResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Column list shared by every node query (see `convert::row_to_node`)
pub const NODE_COLUMNS: &str = "id, title, lft, rgt, attachment, created_at";

const SCHEMA_SQL: &str = r#"
-- Nested-set table: one row per node, ancestry encoded by interval containment
CREATE TABLE IF NOT EXISTS nodes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,   -- never reused after delete
    title TEXT NOT NULL,
    lft INTEGER NOT NULL,
    rgt INTEGER NOT NULL,
    attachment TEXT,                        -- avatar file name (NULL = default avatar)
    created_at INTEGER NOT NULL,            -- Unix nanoseconds
    CHECK (lft < rgt)
);

CREATE INDEX IF NOT EXISTS idx_nodes_lft ON nodes(lft);
CREATE INDEX IF NOT EXISTS idx_nodes_rgt ON nodes(rgt);
CREATE INDEX IF NOT EXISTS idx_nodes_title ON nodes(title);
"#;
