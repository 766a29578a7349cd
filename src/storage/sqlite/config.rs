// File: src/storage/sqlite/config.rs

/// SQLite storage backend configuration
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to database file (or ":memory:" for in-memory)
    pub path: String,

    /// Enable WAL mode so tree reads do not block on the writer's journal
    pub wal_mode: bool,

    /// Busy timeout in milliseconds (another process holding the write lock)
    pub busy_timeout_ms: u32,

    /// Title of the root seeded by `initialize()`
    pub root_title: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: "tree.db".to_string(),
            wal_mode: true,
            busy_timeout_ms: 5000,
            root_title: "ROOT".to_string(),
        }
    }
}
