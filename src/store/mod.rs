//! Remote post store module
//!
//! Translates "posts ordered by creation time, after cursor X, limit N" into
//! store-specific queries and normalizes the results into `DisplayPost`s.
//!
//! # Overview
//!
//! - `PostStore` - adapter trait; each adapter brings its own opaque `Cursor`
//! - `PageResult` - one page of posts plus the cursor of its last record
//! - `FirestoreStore` - Firestore REST (`runQuery` / document `get`)
//! - `MemoryStore` - ordered in-memory store with failure injection
//! - `page_stream` - walk every page of a store as a `Stream`
//!
//! Adapters never retry and never return a partially-filled page. Every
//! failure leaves the adapter as `FetchFailed`, `NotFound` or `InvalidCursor`.

mod firestore;
mod memory;
mod types;

pub use firestore::{FirestoreConfig, FirestoreCursor, FirestoreStore, DEFAULT_BASE_URL};
pub use memory::{MemoryCursor, MemoryStore};
pub use types::{check_page_size, page_stream, PageResult, PostStore};

#[cfg(test)]
pub(crate) mod testing;
