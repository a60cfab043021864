//! Post module
//!
//! Raw post records as stored, the display projection handed to the
//! presentation layer, relative timestamp labels, and per-post addressing.
//!
//! # Overview
//!
//! - `Post` - immutable record as it lives in the remote store
//! - `DisplayPost` - client-facing projection with resolved media URLs and a
//!   timestamp label computed once at fetch time
//! - `post_path` / `parse_post_path` - the `/post/{id}` detail route
//! - `PostMetadata` - title and description for a detail view

mod detail;
mod timestamp;
mod types;

pub use detail::{fetch_post, parse_post_path, post_path, PostMetadata, SITE_NAME};
pub use timestamp::{calendar_date, format_timestamp};
pub use types::{clean_media_ref, DisplayPost, Post};
