use std::sync::Arc;

use crate::storage::{Storage, StorageResult};

/// Result of resolving a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Redirect(String),
    NotFound,
    Expired,
}

/// Looks up slugs and counts successful visits.
pub struct Resolver {
    storage: Arc<dyn Storage>,
}

impl Resolver {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Resolve `slug` as of `now` (unix seconds).
    ///
    /// Expired records are reported and left untouched. Every redirect adds
    /// exactly one click; the increment happens in the store, so concurrent
    /// visits never lose counts.
    pub async fn resolve(&self, slug: &str, now: i64) -> StorageResult<Outcome> {
        let Some(record) = self.storage.get(slug).await? else {
            return Ok(Outcome::NotFound);
        };

        if record.is_expired_at(now) {
            return Ok(Outcome::Expired);
        }

        if !self.storage.increment_clicks(record.id).await? {
            // Deleted between the lookup and the increment.
            return Ok(Outcome::NotFound);
        }

        Ok(Outcome::Redirect(record.original_url))
    }
}
