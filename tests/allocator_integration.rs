//! Allocator integration tests
//!
//! Slug validation, collision handling for requested and generated slugs,
//! and uniqueness under concurrent allocation.

use anyhow::Result;
use async_trait::async_trait;
use slugway::links::slug::{is_valid_slug, SlugSource};
use slugway::links::{AllocationError, Allocator, Outcome, Resolver};
use slugway::models::{timestamp, LinkRecord, NewLink};
use slugway::storage::{SqliteStorage, Storage, StorageResult};
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

async fn create_test_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 5).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

/// Hands out a fixed sequence of candidates
struct ScriptedSlugs(Mutex<VecDeque<String>>);

impl ScriptedSlugs {
    fn new(slugs: &[&str]) -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            slugs.iter().map(|s| s.to_string()).collect(),
        )))
    }

    fn remaining(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl SlugSource for ScriptedSlugs {
    fn candidate(&self) -> String {
        self.0
            .lock()
            .unwrap()
            .pop_front()
            .expect("candidate script exhausted")
    }
}

/// Store whose existence check always misses, so a concurrent writer that
/// won the slug is only detected by the unique constraint on insert.
struct BlindExistsStorage(Arc<dyn Storage>);

#[async_trait]
impl Storage for BlindExistsStorage {
    async fn init(&self) -> Result<()> {
        self.0.init().await
    }

    async fn exists(&self, _slug: &str) -> StorageResult<bool> {
        Ok(false)
    }

    async fn insert(&self, link: NewLink<'_>) -> StorageResult<LinkRecord> {
        self.0.insert(link).await
    }

    async fn get(&self, slug: &str) -> StorageResult<Option<LinkRecord>> {
        self.0.get(slug).await
    }

    async fn increment_clicks(&self, id: i64) -> StorageResult<bool> {
        self.0.increment_clicks(id).await
    }

    async fn update_expiry(&self, id: i64, expires_at: Option<i64>) -> StorageResult<bool> {
        self.0.update_expiry(id, expires_at).await
    }

    async fn delete(&self, id: i64) -> StorageResult<bool> {
        self.0.delete(id).await
    }

    async fn list(&self) -> StorageResult<Vec<LinkRecord>> {
        self.0.list().await
    }
}

#[tokio::test]
async fn test_requested_slug_creates_record() {
    let storage = create_test_storage().await;
    let allocator = Allocator::new(storage.clone(), 6, 5);

    let record = allocator
        .allocate(Some("my-link_1"), "HTTPS://Example.com/Path?q=1", None)
        .await
        .unwrap();

    assert_eq!(record.slug, "my-link_1");
    assert_eq!(record.original_url, "https://example.com/Path?q=1");
    assert_eq!(record.clicks, 0);
    assert_eq!(record.expires_at, None);

    let stored = storage.get("my-link_1").await.unwrap().unwrap();
    assert_eq!(stored, record);
}

#[tokio::test]
async fn test_requested_slug_conflict_keeps_first_destination() {
    let storage = create_test_storage().await;
    let allocator = Allocator::new(storage.clone(), 6, 5);

    allocator
        .allocate(Some("abc123"), "https://a.example/", None)
        .await
        .unwrap();

    let err = allocator
        .allocate(Some("abc123"), "https://b.example/", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AllocationError::SlugConflict));

    let resolver = Resolver::new(storage.clone());
    assert_eq!(
        resolver.resolve("abc123", timestamp::now()).await.unwrap(),
        Outcome::Redirect("https://a.example/".to_string())
    );
    assert_eq!(storage.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_expired_slug_is_not_reused() {
    let storage = create_test_storage().await;
    let allocator = Allocator::new(storage.clone(), 6, 5);

    allocator
        .allocate(Some("old"), "https://a.example/", Some(1))
        .await
        .unwrap();

    let err = allocator
        .allocate(Some("old"), "https://b.example/", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AllocationError::SlugConflict));
}

#[tokio::test]
async fn test_invalid_slug_format_creates_nothing() {
    let storage = create_test_storage().await;
    let allocator = Allocator::new(storage.clone(), 6, 5);

    let too_long = "x".repeat(51);
    let bad_slugs = ["a", "", "has space", "dot.slug", "slash/slug", "é-accent", too_long.as_str()];

    for slug in bad_slugs {
        let err = allocator
            .allocate(Some(slug), "https://example.com/", None)
            .await
            .unwrap_err();
        assert!(
            matches!(err, AllocationError::InvalidSlugFormat),
            "{slug:?} should be rejected, got {err:?}"
        );
    }

    assert!(storage.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_destination_creates_nothing() {
    let storage = create_test_storage().await;
    let allocator = Allocator::new(storage.clone(), 6, 5);

    for url in ["ftp://example.com", "not a url", "javascript:alert(1)", ""] {
        let err = allocator.allocate(None, url, None).await.unwrap_err();
        assert!(
            matches!(err, AllocationError::InvalidDestination(_)),
            "{url:?} should be rejected, got {err:?}"
        );

        let err = allocator.allocate(Some("valid"), url, None).await.unwrap_err();
        assert!(matches!(err, AllocationError::InvalidDestination(_)));
    }

    assert!(storage.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generated_slug_uses_configured_length() {
    let storage = create_test_storage().await;
    let allocator = Allocator::new(storage.clone(), 6, 5);

    let record = allocator
        .allocate(None, "https://example.com/", Some(4_102_444_800))
        .await
        .unwrap();

    assert_eq!(record.slug.len(), 6);
    assert!(record.slug.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(is_valid_slug(&record.slug));
    assert_eq!(record.expires_at, Some(4_102_444_800));
}

#[tokio::test]
async fn test_generated_slug_retries_after_collision() {
    let storage = create_test_storage().await;
    storage
        .insert(NewLink {
            slug: "taken1",
            original_url: "https://taken.example/",
            expires_at: None,
        })
        .await
        .unwrap();

    let source = ScriptedSlugs::new(&["taken1", "fresh1", "unused"]);
    let allocator = Allocator::with_source(storage.clone(), source.clone(), 5);

    let record = allocator
        .allocate(None, "https://example.com/", None)
        .await
        .unwrap();

    assert_eq!(record.slug, "fresh1");
    assert_eq!(source.remaining(), 1);

    let kept = storage.get("taken1").await.unwrap().unwrap();
    assert_eq!(kept.original_url, "https://taken.example/");
}

#[tokio::test]
async fn test_generated_slug_budget_exhausted() {
    let storage = create_test_storage().await;
    storage
        .insert(NewLink {
            slug: "dup",
            original_url: "https://taken.example/",
            expires_at: None,
        })
        .await
        .unwrap();

    let source = ScriptedSlugs::new(&["dup", "dup", "dup", "dup", "dup", "never-drawn"]);
    let allocator = Allocator::with_source(storage.clone(), source.clone(), 5);

    let err = allocator
        .allocate(None, "https://example.com/", None)
        .await
        .unwrap_err();

    assert!(matches!(err, AllocationError::AllocationExhausted { attempts: 5 }));
    assert_eq!(source.remaining(), 1, "budget must bound the number of draws");
    assert_eq!(storage.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_insert_conflict_after_check_is_conflict_for_requested_slug() {
    let inner = create_test_storage().await;
    inner
        .insert(NewLink {
            slug: "raced",
            original_url: "https://winner.example/",
            expires_at: None,
        })
        .await
        .unwrap();

    let storage: Arc<dyn Storage> = Arc::new(BlindExistsStorage(inner.clone()));
    let allocator = Allocator::new(storage, 6, 5);

    let err = allocator
        .allocate(Some("raced"), "https://loser.example/", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AllocationError::SlugConflict));

    let kept = inner.get("raced").await.unwrap().unwrap();
    assert_eq!(kept.original_url, "https://winner.example/");
}

#[tokio::test]
async fn test_insert_conflict_after_check_retries_generated_slug() {
    let inner = create_test_storage().await;
    inner
        .insert(NewLink {
            slug: "raced",
            original_url: "https://winner.example/",
            expires_at: None,
        })
        .await
        .unwrap();

    let storage: Arc<dyn Storage> = Arc::new(BlindExistsStorage(inner.clone()));
    let source = ScriptedSlugs::new(&["raced", "raced", "clean"]);
    let allocator = Allocator::with_source(storage, source.clone(), 5);

    let record = allocator
        .allocate(None, "https://example.com/", None)
        .await
        .unwrap();
    assert_eq!(record.slug, "clean");
    assert_eq!(source.remaining(), 0);

    let source = ScriptedSlugs::new(&["raced", "raced"]);
    let allocator = Allocator::with_source(
        Arc::new(BlindExistsStorage(inner.clone())),
        source,
        2,
    );
    let err = allocator
        .allocate(None, "https://example.com/", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AllocationError::AllocationExhausted { attempts: 2 }));
}

#[tokio::test]
async fn test_concurrent_requested_slug_has_one_winner() {
    let storage = create_test_storage().await;
    let allocator = Arc::new(Allocator::new(storage.clone(), 6, 5));

    let mut handles = vec![];
    for i in 0..10 {
        let allocator = Arc::clone(&allocator);
        handles.push(tokio::spawn(async move {
            let url = format!("https://example.com/{}", i);
            allocator.allocate(Some("contested"), &url, None).await
        }));
    }

    let mut success_count = 0;
    let mut conflict_count = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => success_count += 1,
            Err(AllocationError::SlugConflict) => conflict_count += 1,
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }

    assert_eq!(success_count, 1, "Exactly one allocation should succeed");
    assert_eq!(conflict_count, 9, "All others should get SlugConflict");
    assert_eq!(storage.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_generated_slugs_are_unique() {
    let storage = create_test_storage().await;
    let allocator = Arc::new(Allocator::new(storage.clone(), 6, 5));

    let mut handles = vec![];
    for i in 0..30 {
        let allocator = Arc::clone(&allocator);
        handles.push(tokio::spawn(async move {
            let url = format!("https://example.com/{}", i);
            allocator.allocate(None, &url, None).await
        }));
    }

    let mut slugs = HashSet::new();
    for handle in handles {
        let record = handle.await.unwrap().unwrap();
        assert!(slugs.insert(record.slug), "slug handed out twice");
    }

    assert_eq!(slugs.len(), 30);
    assert_eq!(storage.list().await.unwrap().len(), 30);
}
