use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted slug → destination mapping.
///
/// Timestamps are unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LinkRecord {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
    pub created_at: i64,
    pub clicks: i64,
    pub expires_at: Option<i64>,
}

impl LinkRecord {
    /// A record is expired at and after its expiry instant.
    pub fn is_expired_at(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }
}

/// Values needed to insert a new record. The store assigns `id`,
/// `created_at` and starts `clicks` at zero.
#[derive(Debug, Clone, Copy)]
pub struct NewLink<'a> {
    pub slug: &'a str,
    pub original_url: &'a str,
    pub expires_at: Option<i64>,
}
