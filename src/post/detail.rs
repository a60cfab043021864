//! Per-post addressing and detail metadata

use super::types::DisplayPost;
use crate::error::{Error, Result};
use crate::store::PostStore;
use serde::Serialize;
use tracing::debug;

/// Site name appended to page titles
pub const SITE_NAME: &str = "Quiet Thoughts";

const ROUTE_PREFIX: &str = "/post/";
const TITLE_CHARS: usize = 50;
const DESCRIPTION_CHARS: usize = 160;

/// Detail path for a post id
pub fn post_path(id: &str) -> String {
    format!("{ROUTE_PREFIX}{id}")
}

/// Extract the post id from a `/post/{id}` path.
///
/// A single trailing slash is accepted. Anything with extra segments or an
/// empty id does not address a post.
pub fn parse_post_path(path: &str) -> Option<&str> {
    let id = path.strip_prefix(ROUTE_PREFIX)?;
    let id = id.strip_suffix('/').unwrap_or(id);
    if id.is_empty() || id.contains('/') {
        None
    } else {
        Some(id)
    }
}

/// Resolve a single post, turning a missing id into `Error::NotFound`
pub async fn fetch_post<S>(store: &S, id: &str) -> Result<DisplayPost>
where
    S: PostStore + ?Sized,
{
    debug!("Resolving post {}", id);
    store
        .fetch_single(id)
        .await?
        .ok_or_else(|| Error::not_found(id))
}

/// Title and description for a detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMetadata {
    pub title: String,
    pub description: Option<String>,
}

impl PostMetadata {
    /// Metadata derived from the post body
    pub fn for_post(post: &DisplayPost) -> Self {
        let head: String = post.content.chars().take(TITLE_CHARS).collect();
        let description: String = post.content.chars().take(DESCRIPTION_CHARS).collect();
        Self {
            title: format!("{head}... - {SITE_NAME}"),
            description: Some(description),
        }
    }

    /// Metadata for an unknown post id
    pub fn not_found() -> Self {
        Self {
            title: format!("Post not found - {SITE_NAME}"),
            description: None,
        }
    }

    /// Metadata when the post could not be loaded for another reason
    pub fn fallback() -> Self {
        Self {
            title: format!("Post - {SITE_NAME}"),
            description: None,
        }
    }

    /// Pick metadata for the outcome of a detail fetch
    pub fn from_outcome(outcome: &Result<DisplayPost>) -> Self {
        match outcome {
            Ok(post) => Self::for_post(post),
            Err(e) if e.is_not_found() => Self::not_found(),
            Err(_) => Self::fallback(),
        }
    }
}
