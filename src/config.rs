//! Server configuration

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ServerError;
use crate::tree::assembler::AssemblyMode;

/// What to do when an inserted title already exists somewhere in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateTitlePolicy {
    /// Append the resolver's counter as decimal text and insert anyway
    #[default]
    Suffix,
    /// Refuse the insert with `DuplicateTitle`
    Reject,
}

impl FromStr for DuplicateTitlePolicy {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suffix" => Ok(Self::Suffix),
            "reject" => Ok(Self::Reject),
            other => Err(ServerError::Config(format!(
                "unknown duplicate title policy '{}' (expected 'suffix' or 'reject')",
                other
            ))),
        }
    }
}

/// Tree behaviour settings
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Title given to the root node when the store is seeded
    pub root_title: String,
    /// Maximum accepted length of a requested title
    pub max_title_len: usize,
    /// Duplicate title handling
    pub duplicate_titles: DuplicateTitlePolicy,
    /// How long a mutation or tree read may wait for the guard
    pub lock_timeout: Duration,
    /// How trees are rebuilt from interval data
    pub assembly: AssemblyMode,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_title: "ROOT".to_string(),
            max_title_len: 20,
            duplicate_titles: DuplicateTitlePolicy::Suffix,
            lock_timeout: Duration::from_millis(5000),
            assembly: AssemblyMode::Descendants,
        }
    }
}

impl TreeConfig {
    /// Load from environment variables
    pub fn from_env() -> Result<Self, ServerError> {
        let defaults = Self::default();

        let root_title = std::env::var("TREE_ROOT_TITLE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.root_title);

        let max_title_len = std::env::var("TREE_MAX_TITLE_LEN")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_title_len);

        let duplicate_titles = match std::env::var("TREE_DUPLICATE_TITLES") {
            Ok(s) => s.parse()?,
            Err(_) => defaults.duplicate_titles,
        };

        let lock_timeout = std::env::var("TREE_LOCK_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.lock_timeout);

        let assembly = match std::env::var("TREE_ASSEMBLY") {
            Ok(s) => s.parse()?,
            Err(_) => defaults.assembly,
        };

        Ok(Self {
            root_title,
            max_title_len,
            duplicate_titles,
            lock_timeout,
            assembly,
        })
    }
}

/// Avatar (attachment) file settings
#[derive(Debug, Clone)]
pub struct AvatarConfig {
    /// Directory holding uploaded avatar files
    pub dir: PathBuf,
    /// File served for nodes without an attachment
    pub default_file: String,
    /// Upload size limit in bytes
    pub max_upload_bytes: usize,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./avatars"),
            default_file: "react.png".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub log_level: String,
    /// Allowed CORS origins (empty = any origin)
    pub cors_origins: Vec<String>,
    /// Wipe the tree back to a lone root on start
    pub reset_on_start: bool,
    pub tree: TreeConfig,
    pub avatars: AvatarConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: "./tree.db".to_string(),
            log_level: "info".to_string(),
            cors_origins: vec![],
            reset_on_start: false,
            tree: TreeConfig::default(),
            avatars: AvatarConfig::default(),
        }
    }
}

impl Config {
    /// Socket address string to bind to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated list, dropping blanks
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
