//! HTTP request handlers

mod avatar;
mod health;
mod node;
mod tree;

pub use avatar::get_avatar;
pub use health::health_check;
pub use node::{add_node, delete_node};
pub use tree::get_tree;
