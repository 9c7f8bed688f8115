use std::sync::Arc;

use crate::models::LinkRecord;
use crate::storage::{Storage, StorageResult};

/// Proof that the caller passed an authorization check.
///
/// The link engine never inspects credentials; whoever performs the check
/// (the HTTP auth middleware, the local admin CLI) grants this value and
/// passes it to the admin operations.
#[derive(Debug, Clone, Copy)]
pub struct AdminContext {
    _granted: (),
}

impl AdminContext {
    pub fn granted() -> Self {
        Self { _granted: () }
    }
}

/// Administrative mutations over stored links.
pub struct LinkAdmin {
    storage: Arc<dyn Storage>,
}

impl LinkAdmin {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Every record, newest first.
    pub async fn list_all(&self, _ctx: &AdminContext) -> StorageResult<Vec<LinkRecord>> {
        self.storage.list().await
    }

    /// Overwrite the expiry of `id`. `None` makes the link permanent.
    /// Unknown ids are ignored.
    pub async fn update_expiry(
        &self,
        _ctx: &AdminContext,
        id: i64,
        expires_at: Option<i64>,
    ) -> StorageResult<()> {
        self.storage.update_expiry(id, expires_at).await?;
        Ok(())
    }

    /// Remove `id`. Deleting an id that does not exist is not an error.
    pub async fn delete(&self, _ctx: &AdminContext, id: i64) -> StorageResult<()> {
        self.storage.delete(id).await?;
        Ok(())
    }
}
