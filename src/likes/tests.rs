//! Tests for local like state

use super::*;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn memory_likes() -> LikeStore<MemoryStorage> {
    LikeStore::new(MemoryStorage::new())
}

// ============================================================================
// Storage Tests
// ============================================================================

#[tokio::test]
async fn test_memory_storage_roundtrip() {
    let storage = MemoryStorage::new();

    assert!(storage.get("k").await.unwrap().is_none());
    storage.set("k", "v".to_string()).await.unwrap();
    assert_eq!(storage.get("k").await.unwrap(), Some("v".to_string()));
    storage.remove("k").await.unwrap();
    assert!(storage.get("k").await.unwrap().is_none());
}

#[test]
fn test_memory_storage_clones_share_values() {
    let storage = MemoryStorage::new();
    let clone = storage.clone();

    tokio_test::block_on(async {
        storage.set("k", "v".to_string()).await.unwrap();
        assert_eq!(clone.get("k").await.unwrap(), Some("v".to_string()));
    });
}

#[tokio::test]
async fn test_file_storage_persists_across_opens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("local.json");

    let storage = FileStorage::open(&path).unwrap();
    storage.set("liked-posts", "[\"a\"]".to_string()).await.unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(
        reopened.get("liked-posts").await.unwrap(),
        Some("[\"a\"]".to_string())
    );
    assert_eq!(reopened.path(), path.as_path());
}

#[tokio::test]
async fn test_file_storage_creates_parent_dirs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("state").join("local.json");

    let storage = FileStorage::open(&path).unwrap();
    storage.set("k", "v".to_string()).await.unwrap();

    assert!(path.exists());
}

#[tokio::test]
async fn test_file_storage_remove() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("local.json");

    let storage = FileStorage::open(&path).unwrap();
    storage.set("a", "1".to_string()).await.unwrap();
    storage.set("b", "2".to_string()).await.unwrap();
    storage.remove("a").await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed, serde_json::json!({"b": "2"}));
}

/// Storage whose file can never be written: its parent is a regular file
fn unwritable_storage(dir: &tempfile::TempDir) -> FileStorage {
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    FileStorage::open(blocker.join("local.json")).unwrap()
}

#[tokio::test]
async fn test_file_storage_failed_write_keeps_cache() {
    let dir = tempdir().unwrap();
    let storage = unwritable_storage(&dir);

    assert!(storage.set("k", "v".to_string()).await.is_err());
    assert!(storage.get("k").await.unwrap().is_none());

    let err = storage
        .set_many(vec![("a".to_string(), "1".to_string())])
        .await
        .unwrap_err();
    assert!(matches!(err, crate::error::Error::Storage { .. }));
    assert!(storage.get("a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_storage_set_many_persists_all() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("local.json");

    let storage = FileStorage::open(&path).unwrap();
    storage
        .set_many(vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ])
        .await
        .unwrap();

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(reopened.get("a").await.unwrap(), Some("1".to_string()));
    assert_eq!(reopened.get("b").await.unwrap(), Some("2".to_string()));
}

#[test]
fn test_file_storage_empty_file_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("local.json");
    std::fs::write(&path, "").unwrap();

    assert!(FileStorage::open(&path).is_ok());
}

#[test]
fn test_file_storage_corrupt_file_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("local.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = FileStorage::open(&path).unwrap_err();
    assert!(err.to_string().contains("Local storage error"));
}

// ============================================================================
// LikeStore Tests
// ============================================================================

#[tokio::test]
async fn test_like_is_idempotent() {
    let likes = memory_likes();

    assert!(likes.like("p1").await.unwrap());
    assert!(!likes.like("p1").await.unwrap());
    assert!(likes.like("p2").await.unwrap());

    assert_eq!(likes.liked_posts().await.unwrap(), vec!["p1", "p2"]);
    assert_eq!(likes.total_likes("p1").await.unwrap(), 1);
}

#[tokio::test]
async fn test_unlike() {
    let likes = memory_likes();
    likes.like("p1").await.unwrap();

    assert!(likes.unlike("p1").await.unwrap());
    assert!(!likes.unlike("p1").await.unwrap());
    assert!(!likes.is_liked("p1").await.unwrap());
    assert_eq!(likes.total_likes("p1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_toggle_reflects_membership() {
    let likes = memory_likes();

    assert!(likes.toggle("p1").await.unwrap());
    assert!(likes.is_liked("p1").await.unwrap());
    assert!(!likes.toggle("p1").await.unwrap());
    assert!(!likes.is_liked("p1").await.unwrap());
}

#[tokio::test]
async fn test_stored_format() {
    let likes = memory_likes();
    likes.like("a").await.unwrap();
    likes.like("b").await.unwrap();
    likes.unlike("a").await.unwrap();

    let storage = likes.storage();
    assert_eq!(
        storage.get(LIKED_POSTS_KEY).await.unwrap(),
        Some("[\"b\"]".to_string())
    );
    assert_eq!(
        storage.get(LIKE_COUNTS_KEY).await.unwrap(),
        Some("{\"a\":0,\"b\":1}".to_string())
    );
}

#[tokio::test]
async fn test_failed_like_records_nothing() {
    let dir = tempdir().unwrap();
    let likes = LikeStore::new(unwritable_storage(&dir));

    assert!(likes.like("p1").await.is_err());
    assert!(!likes.is_liked("p1").await.unwrap());
    assert_eq!(likes.total_likes("p1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_tally_never_negative() {
    let storage = MemoryStorage::new();
    storage
        .set(LIKED_POSTS_KEY, "[\"p1\"]".to_string())
        .await
        .unwrap();
    let likes = LikeStore::new(storage);

    likes.unlike("p1").await.unwrap();
    assert_eq!(likes.total_likes("p1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_corrupt_values_read_as_empty() {
    let storage = MemoryStorage::new();
    storage
        .set(LIKED_POSTS_KEY, "not json".to_string())
        .await
        .unwrap();
    storage
        .set(LIKE_COUNTS_KEY, "[1,2".to_string())
        .await
        .unwrap();
    let likes = LikeStore::new(storage);

    assert!(likes.liked_posts().await.unwrap().is_empty());
    assert!(likes.like_counts().await.unwrap().is_empty());

    // The next write replaces the corrupt value
    likes.like("p1").await.unwrap();
    assert_eq!(likes.liked_posts().await.unwrap(), vec!["p1"]);
}

#[tokio::test]
async fn test_anonymous_user_id_is_stable() {
    let likes = memory_likes();

    let first = likes.anonymous_user_id().await.unwrap();
    let second = likes.anonymous_user_id().await.unwrap();

    assert_eq!(first, second);
    assert!(uuid::Uuid::parse_str(&first).is_ok());
    assert_eq!(
        likes.storage().get(ANONYMOUS_USER_ID_KEY).await.unwrap(),
        Some(first)
    );
}

#[tokio::test]
async fn test_anonymous_user_id_keeps_existing() {
    let storage = MemoryStorage::new();
    storage
        .set(ANONYMOUS_USER_ID_KEY, "visitor-1".to_string())
        .await
        .unwrap();
    let likes = LikeStore::new(storage);

    assert_eq!(likes.anonymous_user_id().await.unwrap(), "visitor-1");
}

#[tokio::test]
async fn test_likes_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("local.json");

    {
        let likes = LikeStore::new(FileStorage::open(&path).unwrap());
        likes.like("p1").await.unwrap();
        likes.anonymous_user_id().await.unwrap();
    }

    let likes = LikeStore::new(FileStorage::open(&path).unwrap());
    assert!(likes.is_liked("p1").await.unwrap());
    assert_eq!(likes.total_likes("p1").await.unwrap(), 1);
}
