//! Storage backends
//!
//! `TreeStore` implementations plus the avatar file store.

pub mod attachments;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use crate::traits::TreeStore;

pub use attachments::AvatarStore;
pub use memory::MemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConfig, SqliteStore};
