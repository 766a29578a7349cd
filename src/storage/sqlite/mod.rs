// File: src/storage/sqlite/mod.rs

mod config;
mod convert;
mod nodes;
mod queries;
mod schema;
mod store;

// Public exports
pub use config::SqliteConfig;
pub use store::SqliteStore;
