// File: src/storage/sqlite/store.rs

use super::config::SqliteConfig;
use super::schema;
use crate::error::{ServerError, ServerResult, StorageError};
use crate::traits::{NewNode, NodeId, NodeRecord, TreeStore};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// SQLite implementation of the TreeStore trait
///
/// One `nodes` table holds the whole tree as nested-set intervals.
pub struct SqliteStore {
    /// Database connection (protected by mutex for thread safety)
    conn: Arc<Mutex<Connection>>,

    config: SqliteConfig,
}

impl SqliteStore {
    /// Create a new SqliteStore with default configuration
    ///
    /// Creates the database file if it doesn't exist. Call `initialize()` before use.
    pub fn new<P: AsRef<Path>>(path: P) -> ServerResult<Self> {
        let config = SqliteConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        };
        Self::with_config(config)
    }

    /// Create with custom configuration
    pub fn with_config(config: SqliteConfig) -> ServerResult<Self> {
        let conn = Connection::open(&config.path).map_err(|e| {
            ServerError::Storage(StorageError::ConnectionFailed(format!(
                "failed to open db: {}",
                e
            )))
        })?;

        Self::configure_connection(&conn, &config)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> ServerResult<Self> {
        let config = SqliteConfig {
            path: ":memory:".to_string(),
            wal_mode: false,
            ..Default::default()
        };
        Self::with_config(config)
    }

    /// Open an existing database (fails if doesn't exist)
    pub fn open<P: AsRef<Path>>(path: P) -> ServerResult<Self> {
        if !path.as_ref().exists() {
            return Err(ServerError::Storage(StorageError::ConnectionFailed(
                "database does not exist".into(),
            )));
        }
        Self::new(path)
    }

    /// Configure SQLite connection pragmas
    fn configure_connection(conn: &Connection, config: &SqliteConfig) -> ServerResult<()> {
        if config.wal_mode {
            conn.pragma_update(None, "journal_mode", "WAL")?;
        }
        conn.pragma_update(None, "busy_timeout", config.busy_timeout_ms)?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(())
    }

    /// Create the schema and seed the root if the table is empty
    ///
    /// Safe to call on every start: an existing tree is left as it is.
    pub fn initialize(&self) -> ServerResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;

        let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
        let seeded = conn.execute(
            "INSERT INTO nodes (title, lft, rgt, attachment, created_at)
             SELECT ?1, 1, 2, NULL, ?2
             WHERE NOT EXISTS (SELECT 1 FROM nodes)",
            rusqlite::params![self.config.root_title, now],
        )?;

        if seeded > 0 {
            info!(root_title = %self.config.root_title, "Seeded root node");
        } else {
            debug!("Tree already initialized");
        }
        Ok(())
    }

    /// Drop every node, restart id assignment and seed a fresh root
    pub fn reset(&self) -> ServerResult<()> {
        {
            let mut conn = self.get_conn()?;
            schema::create_tables(&conn)?;

            let tx = conn.transaction()?;
            tx.execute("DELETE FROM nodes", [])?;
            tx.execute("DELETE FROM sqlite_sequence WHERE name = 'nodes'", [])?;
            tx.commit()?;
        }
        info!("Tree reset");
        self.initialize()
    }

    /// Path this store was opened with
    pub fn path(&self) -> &str {
        &self.config.path
    }

    /// Get locked connection for internal operations
    pub(crate) fn get_conn(&self) -> ServerResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            ServerError::Storage(StorageError::ConnectionFailed("lock poisoned".into()))
        })
    }
}

impl TreeStore for SqliteStore {
    fn insert(&self, node: NewNode) -> ServerResult<NodeId> {
        self.insert_impl(node)
    }

    fn delete(&self, id: NodeId) -> ServerResult<()> {
        self.delete_impl(id)
    }

    fn get_root(&self) -> ServerResult<NodeRecord> {
        self.get_root_impl()
    }

    fn get_node(&self, id: NodeId) -> ServerResult<NodeRecord> {
        self.get_node_impl(id)
    }

    fn children(&self, node: &NodeRecord) -> ServerResult<Vec<NodeRecord>> {
        self.children_impl(node)
    }

    fn snapshot(&self) -> ServerResult<Vec<NodeRecord>> {
        self.snapshot_impl()
    }

    fn title_exists(&self, title: &str) -> ServerResult<bool> {
        self.title_exists_impl(title)
    }

    fn node_count(&self) -> ServerResult<u64> {
        self.node_count_impl()
    }
}
