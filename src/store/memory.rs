//! In-memory post store
//!
//! Holds posts ordered by `(created_at, id)` descending, the same order the
//! Firestore adapter asks for. Cursors carry the sort key of the last post,
//! so posts inserted between two page fetches never shift later pages.

use super::types::{check_page_size, PageResult, PostStore};
use crate::error::{Error, Result};
use crate::media::{MediaResolver, PassthroughResolver};
use crate::post::{DisplayPost, Post};
use crate::types::MediaVariant;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Position after a specific post
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    created_at: DateTime<Utc>,
    id: String,
}

impl MemoryCursor {
    fn of(post: &Post) -> Self {
        Self {
            created_at: post.created_at,
            id: post.id.clone(),
        }
    }

    /// True if `post` sorts strictly after this position
    fn precedes(&self, post: &Post) -> bool {
        (post.created_at, post.id.as_str()) < (self.created_at, self.id.as_str())
    }
}

/// Ordered in-memory store
#[derive(Debug)]
pub struct MemoryStore {
    posts: RwLock<Vec<Post>>,
    resolver: Arc<dyn MediaResolver>,
    calls: AtomicUsize,
    pending_failures: AtomicUsize,
}

impl MemoryStore {
    /// Create a store seeded with `posts` (any order)
    pub fn new(posts: Vec<Post>) -> Self {
        Self::with_resolver(posts, Arc::new(PassthroughResolver))
    }

    /// Create a store with a custom media resolver
    pub fn with_resolver(mut posts: Vec<Post>, resolver: Arc<dyn MediaResolver>) -> Self {
        sort_newest_first(&mut posts);
        Self {
            posts: RwLock::new(posts),
            resolver,
            calls: AtomicUsize::new(0),
            pending_failures: AtomicUsize::new(0),
        }
    }

    /// Seed `count` text posts one second apart, `post-0` being the newest
    pub fn with_generated(count: usize) -> Self {
        let now = Utc::now();
        let posts = (0..count)
            .map(|i| {
                Post::new(
                    format!("post-{i}"),
                    format!("Content {i}"),
                    now - chrono::Duration::seconds(i as i64),
                )
            })
            .collect();
        Self::new(posts)
    }

    /// Insert a post, keeping the order
    pub async fn insert(&self, post: Post) {
        let mut posts = self.posts.write().await;
        posts.push(post);
        sort_newest_first(&mut posts);
    }

    /// Number of stored posts
    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }

    /// Make the next `count` calls fail with `FetchFailed`
    pub fn fail_next(&self, count: usize) {
        self.pending_failures.store(count, Ordering::SeqCst);
    }

    /// Total calls received (including failed ones)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(Error::fetch_failed("store unavailable"));
        }
        Ok(())
    }

    fn display(&self, post: &Post, variant: MediaVariant, now: DateTime<Utc>) -> DisplayPost {
        DisplayPost::from_post(post.clone(), self.resolver.as_ref(), variant, now)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    type Cursor = MemoryCursor;

    async fn fetch_page(
        &self,
        page_size: u32,
        after: Option<&MemoryCursor>,
    ) -> Result<PageResult<MemoryCursor>> {
        self.begin_call()?;
        check_page_size(page_size)?;

        let posts = self.posts.read().await;
        let start = match after {
            Some(cursor) => posts
                .iter()
                .position(|p| cursor.precedes(p))
                .unwrap_or(posts.len()),
            None => 0,
        };

        let page: Vec<&Post> = posts.iter().skip(start).take(page_size as usize).collect();
        let cursor = page.last().map(|p| MemoryCursor::of(p));
        let now = Utc::now();
        let display = page
            .iter()
            .map(|p| self.display(p, MediaVariant::Feed, now))
            .collect();

        debug!(
            "Memory store page: start={} size={} returned={}",
            start,
            page_size,
            page.len()
        );
        Ok(PageResult::from_records(display, cursor, page_size))
    }

    async fn fetch_single(&self, id: &str) -> Result<Option<DisplayPost>> {
        self.begin_call()?;
        let posts = self.posts.read().await;
        Ok(posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| self.display(p, MediaVariant::Detail, Utc::now())))
    }

    async fn fetch_all(&self) -> Result<Vec<DisplayPost>> {
        self.begin_call()?;
        let posts = self.posts.read().await;
        let now = Utc::now();
        Ok(posts
            .iter()
            .map(|p| self.display(p, MediaVariant::Feed, now))
            .collect())
    }
}

fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
