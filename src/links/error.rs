use crate::storage::StorageError;
use thiserror::Error;

/// Reasons a link could not be created.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("invalid destination URL: {0}")]
    InvalidDestination(String),
    #[error("slug must be 2-50 characters of A-Z, a-z, 0-9, '_' or '-'")]
    InvalidSlugFormat,
    #[error("slug already exists")]
    SlugConflict,
    #[error("could not find a free slug after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },
    #[error(transparent)]
    Storage(#[from] StorageError),
}
