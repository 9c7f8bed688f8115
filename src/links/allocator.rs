use std::sync::Arc;

use super::destination::normalize_destination;
use super::slug::{is_valid_slug, RandomSlugs, SlugSource};
use super::AllocationError;
use crate::models::{LinkRecord, NewLink};
use crate::storage::{Storage, StorageError};

/// Assigns slugs and writes new link records.
pub struct Allocator {
    storage: Arc<dyn Storage>,
    source: Arc<dyn SlugSource>,
    max_attempts: u32,
}

impl Allocator {
    pub fn new(storage: Arc<dyn Storage>, slug_length: usize, max_attempts: u32) -> Self {
        Self::with_source(storage, Arc::new(RandomSlugs::new(slug_length)), max_attempts)
    }

    pub fn with_source(
        storage: Arc<dyn Storage>,
        source: Arc<dyn SlugSource>,
        max_attempts: u32,
    ) -> Self {
        Self {
            storage,
            source,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create a link under `requested` or, when absent, under a generated slug.
    ///
    /// A requested slug that is taken is reported as
    /// [`AllocationError::SlugConflict`] and never remapped. Generated slugs
    /// that collide are redrawn until the attempt budget runs out.
    pub async fn allocate(
        &self,
        requested: Option<&str>,
        destination: &str,
        expires_at: Option<i64>,
    ) -> Result<LinkRecord, AllocationError> {
        let original_url = normalize_destination(destination)?;

        match requested {
            Some(slug) => self.allocate_requested(slug, &original_url, expires_at).await,
            None => self.allocate_generated(&original_url, expires_at).await,
        }
    }

    async fn allocate_requested(
        &self,
        slug: &str,
        original_url: &str,
        expires_at: Option<i64>,
    ) -> Result<LinkRecord, AllocationError> {
        if !is_valid_slug(slug) {
            return Err(AllocationError::InvalidSlugFormat);
        }

        if self.storage.exists(slug).await? {
            return Err(AllocationError::SlugConflict);
        }

        let link = NewLink {
            slug,
            original_url,
            expires_at,
        };

        // Another writer may have taken the slug since the existence check.
        match self.storage.insert(link).await {
            Ok(record) => Ok(record),
            Err(StorageError::Conflict) => Err(AllocationError::SlugConflict),
            Err(err) => Err(err.into()),
        }
    }

    async fn allocate_generated(
        &self,
        original_url: &str,
        expires_at: Option<i64>,
    ) -> Result<LinkRecord, AllocationError> {
        for _ in 0..self.max_attempts {
            let slug = self.source.candidate();

            if self.storage.exists(&slug).await? {
                continue;
            }

            let link = NewLink {
                slug: &slug,
                original_url,
                expires_at,
            };

            match self.storage.insert(link).await {
                Ok(record) => return Ok(record),
                Err(StorageError::Conflict) => continue,
                Err(err) => return Err(err.into()),
            }
        }

        Err(AllocationError::AllocationExhausted {
            attempts: self.max_attempts,
        })
    }
}
