//! nested-tree-server - Nested-set tree storage behind a small HTTP API

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nested_tree_server::api::{create_router, AppState};
use nested_tree_server::config::{parse_list, AvatarConfig, Config, TreeConfig};
use nested_tree_server::storage::{AvatarStore, SqliteConfig, SqliteStore};
use nested_tree_server::{LocalTreeClient, TreeService};

#[derive(Parser, Debug)]
#[command(name = "nested-tree-server")]
#[command(about = "Nested-set tree storage behind a small HTTP API")]
struct Args {
    /// Host to bind to
    #[arg(long, env = "TREE_SERVER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(long, env = "TREE_SERVER_PORT", default_value = "8080")]
    port: u16,

    /// Path to SQLite database
    #[arg(long, env = "TREE_DATABASE_PATH", default_value = "./tree.db")]
    database: String,

    /// Directory holding avatar files
    #[arg(long, env = "TREE_AVATARS_DIR", default_value = "./avatars")]
    avatars_dir: PathBuf,

    /// Avatar served for nodes without an upload (file name inside the avatars dir)
    #[arg(long, env = "TREE_DEFAULT_AVATAR", default_value = "react.png")]
    default_avatar: String,

    /// Log level
    #[arg(long, env = "TREE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Comma-separated list of allowed CORS origins (any origin if not set)
    #[arg(long, env = "TREE_CORS_ORIGINS")]
    cors_origins: Option<String>,

    /// How long a request may wait for the tree lock, in milliseconds
    #[arg(long, env = "TREE_LOCK_TIMEOUT_MS")]
    lock_timeout_ms: Option<u64>,

    /// Duplicate title handling: "suffix" or "reject"
    #[arg(long, env = "TREE_DUPLICATE_TITLES")]
    duplicate_titles: Option<String>,

    /// Wipe the tree back to a lone root before serving
    #[arg(long, env = "TREE_RESET", default_value = "false")]
    reset: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut tree = TreeConfig::from_env()?;
        if let Some(ms) = self.lock_timeout_ms {
            tree.lock_timeout = Duration::from_millis(ms);
        }
        if let Some(policy) = self.duplicate_titles {
            tree.duplicate_titles = policy.parse()?;
        }

        Ok(Config {
            host: self.host,
            port: self.port,
            database_path: self.database,
            log_level: self.log_level,
            cors_origins: self.cors_origins.as_deref().map(parse_list).unwrap_or_default(),
            reset_on_start: self.reset,
            tree,
            avatars: AvatarConfig {
                dir: self.avatars_dir,
                default_file: self.default_avatar,
                ..AvatarConfig::default()
            },
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI args
    let config = Args::parse().into_config()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_level))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting nested-tree-server v{}", env!("CARGO_PKG_VERSION"));

    // Storage
    let store = SqliteStore::with_config(SqliteConfig {
        path: config.database_path.clone(),
        root_title: config.tree.root_title.clone(),
        ..SqliteConfig::default()
    })
    .context("failed to open database")?;

    if config.reset_on_start {
        store.reset()?;
    } else {
        store.initialize()?;
    }
    tracing::info!(path = %config.database_path, "Database ready");

    // Core + HTTP state
    let service = Arc::new(TreeService::new(Arc::new(store), &config.tree));
    let count = service.verify().context("stored tree failed verification")?;
    tracing::info!(nodes = count, "Tree verified");

    let state = Arc::new(AppState {
        client: Arc::new(LocalTreeClient::new(service)),
        avatars: AvatarStore::new(config.avatars.clone()),
        max_title_len: config.tree.max_title_len,
        cors_origins: config.cors_origins.clone(),
    });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    tracing::info!("Server has started -> http://{}/", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
