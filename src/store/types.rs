//! Store adapter trait and page types

use crate::error::{Error, Result};
use crate::post::DisplayPost;
use async_trait::async_trait;
use futures::stream::{self, Stream};
use std::fmt::Debug;

/// One fetched page
#[derive(Debug, Clone)]
pub struct PageResult<C> {
    /// Posts in creation-time descending order
    pub posts: Vec<DisplayPost>,
    /// Store handle to the last post of this page, `None` only for an empty page
    pub cursor: Option<C>,
    /// True iff the page came back exactly full
    pub has_more: bool,
}

impl<C> PageResult<C> {
    /// Build a page, deriving `has_more` from the requested size
    pub fn from_records(posts: Vec<DisplayPost>, cursor: Option<C>, page_size: u32) -> Self {
        let has_more = posts.len() == page_size as usize;
        Self {
            posts,
            cursor,
            has_more,
        }
    }

    /// An empty, final page
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            cursor: None,
            has_more: false,
        }
    }

    /// Number of posts in the page
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Check if the page holds no posts
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Adapter over a remote document store holding posts
///
/// `Cursor` is whatever handle the store uses to mark a position. Callers
/// pass it back unmodified as the `after` argument of the next call and never
/// inspect, compare or persist it.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Opaque position handle
    type Cursor: Clone + Debug + Send + Sync + 'static;

    /// Fetch up to `page_size` posts ordered by `createdAt` descending,
    /// starting strictly after `after` when given.
    async fn fetch_page(
        &self,
        page_size: u32,
        after: Option<&Self::Cursor>,
    ) -> Result<PageResult<Self::Cursor>>;

    /// Fetch one post by id, `None` if it does not exist
    async fn fetch_single(&self, id: &str) -> Result<Option<DisplayPost>>;

    /// Fetch every post, newest first
    async fn fetch_all(&self) -> Result<Vec<DisplayPost>>;
}

/// Reject a zero page size
pub fn check_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 {
        return Err(Error::fetch_failed("page size must be at least 1"));
    }
    Ok(())
}

/// Walk a store page by page.
///
/// Yields each page in order and ends after the first short page or the
/// first error.
pub fn page_stream<'a, S>(
    store: &'a S,
    page_size: u32,
) -> impl Stream<Item = Result<PageResult<S::Cursor>>> + 'a
where
    S: PostStore + ?Sized,
{
    stream::unfold(Some(None::<S::Cursor>), move |state| async move {
        let after = state?;
        match store.fetch_page(page_size, after.as_ref()).await {
            Ok(page) => {
                let next = if page.has_more {
                    page.cursor.clone().map(Some)
                } else {
                    None
                };
                Some((Ok(page), next))
            }
            Err(e) => Some((Err(e), None)),
        }
    })
}
