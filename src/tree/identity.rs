//! Duplicate title resolution at insert time

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::config::DuplicateTitlePolicy;
use crate::error::{ServerError, ServerResult};
use crate::traits::TreeStore;

/// Advisory de-duplication of titles
///
/// Under `Suffix` a title already present anywhere in the tree gets the next counter
/// value appended as decimal text. The counter belongs to this resolver: it starts at 1,
/// is never reset, and is not persisted. The renamed title is not re-checked, so it can
/// still collide with existing content.
#[derive(Debug)]
pub struct IdentityResolver {
    policy: DuplicateTitlePolicy,
    counter: AtomicU64,
}

impl IdentityResolver {
    pub fn new(policy: DuplicateTitlePolicy) -> Self {
        Self {
            policy,
            counter: AtomicU64::new(1),
        }
    }

    pub fn policy(&self) -> DuplicateTitlePolicy {
        self.policy
    }

    /// Title to store for a requested `title`
    ///
    /// Must run inside the mutation section so the existence check and the insert see
    /// the same table.
    pub fn resolve(&self, store: &dyn TreeStore, title: &str) -> ServerResult<String> {
        if !store.title_exists(title)? {
            return Ok(title.to_string());
        }

        match self.policy {
            DuplicateTitlePolicy::Reject => {
                warn!(title, "Rejected duplicate title");
                Err(ServerError::DuplicateTitle(title.to_string()))
            }
            DuplicateTitlePolicy::Suffix => {
                let n = self.counter.fetch_add(1, Ordering::Relaxed);
                let renamed = format!("{}{}", title, n);
                warn!(title, renamed = %renamed, "Duplicate title renamed");
                Ok(renamed)
            }
        }
    }
}
