use crate::models::{LinkRecord, NewLink};
use crate::storage::{Storage, StorageError, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStorage {
    pool: Arc<PgPool>,
}

impl PostgresStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS links (
                id BIGSERIAL PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                original_url TEXT NOT NULL,
                created_at BIGINT NOT NULL,
                clicks BIGINT NOT NULL DEFAULT 0,
                expires_at BIGINT
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_links_slug ON links(slug)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_links_created_at ON links(created_at)")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn exists(&self, slug: &str) -> StorageResult<bool> {
        let found = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM links WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(found)
    }

    async fn insert(&self, link: NewLink<'_>) -> StorageResult<LinkRecord> {
        let created_at = chrono::Utc::now().timestamp();

        let row = sqlx::query_as::<_, LinkRecord>(
            r#"
            INSERT INTO links (slug, original_url, created_at, clicks, expires_at)
            VALUES ($1, $2, $3, 0, $4)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id, slug, original_url, created_at, clicks, expires_at
            "#,
        )
        .bind(link.slug)
        .bind(link.original_url)
        .bind(created_at)
        .bind(link.expires_at)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.ok_or(StorageError::Conflict)
    }

    async fn get(&self, slug: &str) -> StorageResult<Option<LinkRecord>> {
        let link = sqlx::query_as::<_, LinkRecord>(
            r#"
            SELECT id, slug, original_url, created_at, clicks, expires_at
            FROM links
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn increment_clicks(&self, id: i64) -> StorageResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET clicks = clicks + 1
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_expiry(&self, id: i64, expires_at: Option<i64>) -> StorageResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET expires_at = $1
            WHERE id = $2
            "#,
        )
        .bind(expires_at)
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> StorageResult<Vec<LinkRecord>> {
        let links = sqlx::query_as::<_, LinkRecord>(
            r#"
            SELECT id, slug, original_url, created_at, clicks, expires_at
            FROM links
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }
}
