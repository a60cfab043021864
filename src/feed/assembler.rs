//! Ordered post list built page by page

use crate::post::DisplayPost;
use crate::types::PostId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// What to do with a post whose id is already displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Append pages verbatim, relying on the store's cursor ordering
    #[default]
    Trust,
    /// Skip posts whose id is already displayed
    Drop,
}

/// Concatenates fetched pages into the displayed list.
///
/// Pages are appended in fetch order and never re-sorted. Ids repeated across
/// pages are always counted and logged; the [`DuplicatePolicy`] decides
/// whether they are kept.
#[derive(Debug, Clone, Default)]
pub struct FeedAssembler {
    posts: Vec<DisplayPost>,
    seen: HashSet<PostId>,
    policy: DuplicatePolicy,
    overlaps: usize,
}

impl FeedAssembler {
    /// Create an empty assembler
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Append a page, returning how many posts were added
    pub fn append(&mut self, page: Vec<DisplayPost>) -> usize {
        let before = self.posts.len();
        let mut repeated = Vec::new();

        for post in page {
            if !self.seen.insert(post.id.clone()) {
                repeated.push(post.id.clone());
                if self.policy == DuplicatePolicy::Drop {
                    continue;
                }
            }
            self.posts.push(post);
        }

        if !repeated.is_empty() {
            self.overlaps += repeated.len();
            warn!(
                "Page repeats {} already displayed post(s) {:?} (policy: {:?})",
                repeated.len(),
                repeated,
                self.policy
            );
        }

        self.posts.len() - before
    }

    /// Remove every post
    pub fn clear(&mut self) {
        self.posts.clear();
        self.seen.clear();
        self.overlaps = 0;
    }

    /// Displayed posts in order
    pub fn posts(&self) -> &[DisplayPost] {
        &self.posts
    }

    /// Number of displayed posts
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Check if nothing is displayed
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Check if a post id is displayed
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Repeated ids seen since the last clear
    pub fn overlaps(&self) -> usize {
        self.overlaps
    }

    /// Active duplicate policy
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }
}
