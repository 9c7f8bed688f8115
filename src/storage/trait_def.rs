use crate::models::{LinkRecord, NewLink};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("slug already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StorageError::Conflict;
            }
        }
        StorageError::Other(err.into())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable slug → link mapping shared by the allocator, the resolver and
/// the admin operations.
///
/// Implementations must enforce slug uniqueness themselves (a `UNIQUE`
/// constraint) and increment clicks without a read-modify-write round trip.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables and indexes)
    async fn init(&self) -> Result<()>;

    /// Whether any record, expired or not, holds this slug
    async fn exists(&self, slug: &str) -> StorageResult<bool>;

    /// Insert a new record. Fails with [`StorageError::Conflict`] when the
    /// slug is already taken.
    async fn insert(&self, link: NewLink<'_>) -> StorageResult<LinkRecord>;

    /// Get a record by exact slug
    async fn get(&self, slug: &str) -> StorageResult<Option<LinkRecord>>;

    /// Atomically add one click. Returns false if the record no longer exists.
    async fn increment_clicks(&self, id: i64) -> StorageResult<bool>;

    /// Overwrite the expiry. Returns false if the record does not exist.
    async fn update_expiry(&self, id: i64, expires_at: Option<i64>) -> StorageResult<bool>;

    /// Remove a record. Returns false if the record did not exist.
    async fn delete(&self, id: i64) -> StorageResult<bool>;

    /// All records, newest first
    async fn list(&self) -> StorageResult<Vec<LinkRecord>>;
}
