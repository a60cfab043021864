//! Local like state module
//!
//! Tracks which posts this visitor liked, plus an anonymous visitor id, in a
//! key-value side table that never influences the feed.
//!
//! # Overview
//!
//! The likes module provides:
//! - `KeyValueStorage` - string key-value capability
//! - `MemoryStorage` / `FileStorage` - in-process and JSON-file backends
//! - `LikeStore` - idempotent like set, local tallies, visitor id

mod storage;
mod store;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{LikeStore, ANONYMOUS_USER_ID_KEY, LIKED_POSTS_KEY, LIKE_COUNTS_KEY};

#[cfg(test)]
mod tests;
