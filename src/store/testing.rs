//! Store doubles for unit tests

use super::{MemoryCursor, MemoryStore, PageResult, PostStore};
use crate::error::Result;
use crate::media::PassthroughResolver;
use crate::post::{DisplayPost, Post};
use crate::types::MediaVariant;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Semaphore;

/// Memory store whose page fetches wait for a permit
#[derive(Debug)]
pub(crate) struct GatedStore {
    pub inner: MemoryStore,
    gate: Semaphore,
}

impl GatedStore {
    /// Gate closed: every `fetch_page` blocks until `open` is called
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            gate: Semaphore::new(0),
        }
    }

    /// Let `count` more fetches through
    pub fn open(&self, count: usize) {
        self.gate.add_permits(count);
    }
}

#[async_trait]
impl PostStore for GatedStore {
    type Cursor = MemoryCursor;

    async fn fetch_page(
        &self,
        page_size: u32,
        after: Option<&MemoryCursor>,
    ) -> Result<PageResult<MemoryCursor>> {
        self.gate.acquire().await.unwrap().forget();
        self.inner.fetch_page(page_size, after).await
    }

    async fn fetch_single(&self, id: &str) -> Result<Option<DisplayPost>> {
        self.inner.fetch_single(id).await
    }

    async fn fetch_all(&self) -> Result<Vec<DisplayPost>> {
        self.inner.fetch_all().await
    }
}

/// Offset-paged store whose pages overlap the previous one by `overlap` posts,
/// the way a window shifts when a post lands between two fetches
#[derive(Debug)]
pub(crate) struct OverlappingStore {
    posts: Vec<Post>,
    overlap: usize,
}

impl OverlappingStore {
    pub fn new(count: usize, overlap: usize) -> Self {
        let now = Utc::now();
        let posts = (0..count)
            .map(|i| {
                Post::new(
                    format!("post-{i}"),
                    format!("Content {i}"),
                    now - Duration::seconds(i as i64),
                )
            })
            .collect();
        Self { posts, overlap }
    }
}

#[async_trait]
impl PostStore for OverlappingStore {
    type Cursor = usize;

    async fn fetch_page(&self, page_size: u32, after: Option<&usize>) -> Result<PageResult<usize>> {
        let start = after.map_or(0, |end| end.saturating_sub(self.overlap));
        let now = Utc::now();
        let page: Vec<DisplayPost> = self
            .posts
            .iter()
            .skip(start)
            .take(page_size as usize)
            .map(|p| {
                DisplayPost::from_post(p.clone(), &PassthroughResolver, MediaVariant::Feed, now)
            })
            .collect();
        let cursor = (!page.is_empty()).then(|| start + page.len());
        Ok(PageResult::from_records(page, cursor, page_size))
    }

    async fn fetch_single(&self, _id: &str) -> Result<Option<DisplayPost>> {
        Ok(None)
    }

    async fn fetch_all(&self) -> Result<Vec<DisplayPost>> {
        Ok(Vec::new())
    }
}
