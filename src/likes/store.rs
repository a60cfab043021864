//! Per-visitor like state

use super::storage::KeyValueStorage;
use crate::error::{Error, Result};
use crate::types::PostId;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use uuid::Uuid;

/// Key holding the JSON array of liked post ids
pub const LIKED_POSTS_KEY: &str = "liked-posts";

/// Key holding the anonymous visitor id
pub const ANONYMOUS_USER_ID_KEY: &str = "anonymous-user-id";

/// Key holding the JSON object of local like tallies
pub const LIKE_COUNTS_KEY: &str = "all-liked-posts";

/// Liked posts of this visitor.
///
/// Purely local and non-authoritative: nothing here feeds back into
/// pagination or ordering. Liking is idempotent, and tallies only move when
/// membership actually changes.
#[derive(Debug, Clone)]
pub struct LikeStore<K> {
    storage: K,
}

impl<K: KeyValueStorage> LikeStore<K> {
    /// Wrap a storage backend
    pub fn new(storage: K) -> Self {
        Self { storage }
    }

    /// Underlying storage
    pub fn storage(&self) -> &K {
        &self.storage
    }

    /// Liked ids in the order they were liked
    pub async fn liked_posts(&self) -> Result<Vec<PostId>> {
        self.read_json(LIKED_POSTS_KEY).await
    }

    /// Check if a post is liked
    pub async fn is_liked(&self, id: &str) -> Result<bool> {
        Ok(self.liked_posts().await?.iter().any(|liked| liked == id))
    }

    /// Like a post, returning true if it was not liked before
    pub async fn like(&self, id: &str) -> Result<bool> {
        let mut liked = self.liked_posts().await?;
        if liked.iter().any(|l| l == id) {
            return Ok(false);
        }

        liked.push(id.to_string());
        self.commit(id, &liked, true).await?;
        debug!("Liked post {id}");
        Ok(true)
    }

    /// Unlike a post, returning true if it was liked before
    pub async fn unlike(&self, id: &str) -> Result<bool> {
        let mut liked = self.liked_posts().await?;
        let before = liked.len();
        liked.retain(|l| l != id);
        if liked.len() == before {
            return Ok(false);
        }

        self.commit(id, &liked, false).await?;
        debug!("Unliked post {id}");
        Ok(true)
    }

    /// Flip a post's like, returning the new membership
    pub async fn toggle(&self, id: &str) -> Result<bool> {
        if self.is_liked(id).await? {
            self.unlike(id).await?;
            Ok(false)
        } else {
            self.like(id).await?;
            Ok(true)
        }
    }

    /// Local like tally of a post
    pub async fn total_likes(&self, id: &str) -> Result<u64> {
        Ok(self.like_counts().await?.get(id).copied().unwrap_or(0))
    }

    /// Every local like tally
    pub async fn like_counts(&self) -> Result<BTreeMap<PostId, u64>> {
        self.read_json(LIKE_COUNTS_KEY).await
    }

    /// Anonymous visitor id, generated and stored on first access
    pub async fn anonymous_user_id(&self) -> Result<String> {
        if let Some(id) = self.storage.get(ANONYMOUS_USER_ID_KEY).await? {
            if !id.is_empty() {
                return Ok(id);
            }
        }

        let id = Uuid::new_v4().to_string();
        self.storage.set(ANONYMOUS_USER_ID_KEY, id.clone()).await?;
        debug!("Generated anonymous user id");
        Ok(id)
    }

    /// Store the new liked set and the moved tally in one write
    async fn commit(&self, id: &str, liked: &[PostId], increment: bool) -> Result<()> {
        let mut counts = self.like_counts().await?;
        let count = counts.entry(id.to_string()).or_insert(0);
        *count = if increment {
            count.saturating_add(1)
        } else {
            count.saturating_sub(1)
        };

        self.storage
            .set_many(vec![
                (LIKED_POSTS_KEY.to_string(), to_json(LIKED_POSTS_KEY, liked)?),
                (LIKE_COUNTS_KEY.to_string(), to_json(LIKE_COUNTS_KEY, &counts)?),
            ])
            .await
    }

    /// Read a JSON value, treating a missing or corrupt entry as empty
    async fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        let Some(raw) = self.storage.get(key).await? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("Ignoring corrupt local value under '{key}': {e}");
                Ok(T::default())
            }
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(key: &str, value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| Error::storage(format!("Failed to serialize '{key}': {e}")))
}
