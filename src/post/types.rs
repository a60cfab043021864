//! Post record types
//!
//! `Post` mirrors what the store holds; `DisplayPost` is derived from it once
//! per fetch and never refreshed afterwards.

use super::timestamp::format_timestamp;
use crate::media::MediaResolver;
use crate::types::{MediaKind, MediaVariant, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable post record as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Store-assigned identifier, unique and stable
    pub id: PostId,
    /// Post body
    pub content: String,
    /// Opaque image reference (public id or URL)
    #[serde(default)]
    pub image_ref: Option<String>,
    /// Opaque video reference (public id or URL)
    #[serde(default)]
    pub video_ref: Option<String>,
    /// Assigned by the store at write time
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a text-only post
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            image_ref: None,
            video_ref: None,
            created_at,
        }
    }

    /// Attach an image reference
    #[must_use]
    pub fn with_image(mut self, reference: impl Into<String>) -> Self {
        self.image_ref = Some(reference.into());
        self
    }

    /// Attach a video reference
    #[must_use]
    pub fn with_video(mut self, reference: impl Into<String>) -> Self {
        self.video_ref = Some(reference.into());
        self
    }
}

/// Client-facing projection of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPost {
    pub id: PostId,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Relative label computed against the fetch time
    pub timestamp_label: String,
}

impl DisplayPost {
    /// Project a stored post for display.
    ///
    /// Media references are resolved for `variant`; the timestamp label is
    /// relative to `now` and stays fixed afterwards.
    pub fn from_post(
        post: Post,
        resolver: &dyn MediaResolver,
        variant: MediaVariant,
        now: DateTime<Utc>,
    ) -> Self {
        let image_url = clean_media_ref(post.image_ref)
            .and_then(|r| resolver.resolve(&r, MediaKind::Image, variant));
        let video_url = clean_media_ref(post.video_ref)
            .and_then(|r| resolver.resolve(&r, MediaKind::Video, variant));

        Self {
            id: post.id,
            content: post.content,
            image_url,
            video_url,
            timestamp_label: format_timestamp(post.created_at, now),
        }
    }

    /// Check if the post carries any media
    pub fn has_media(&self) -> bool {
        self.image_url.is_some() || self.video_url.is_some()
    }
}

/// Normalize a raw media reference.
///
/// Blank values and the literal string `"null"` (written by some upload
/// paths) mean "no media".
pub fn clean_media_ref(reference: Option<String>) -> Option<String> {
    let reference = reference?;
    let trimmed = reference.trim();
    if trimmed.is_empty() || trimmed == "null" {
        None
    } else if trimmed.len() == reference.len() {
        Some(reference)
    } else {
        Some(trimmed.to_string())
    }
}
