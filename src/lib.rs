// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]
#![allow(clippy::float_cmp)]

//! # Quiet Thoughts
//!
//! Feed core for an anonymous short-post ("venting") board: cursor-based
//! pagination over a remote document store, a scroll trigger that asks for
//! the next page, and a feed assembler that concatenates pages for display.
//! Per-visitor like state lives in a local side table.
//!
//! ## Features
//!
//! - **Opaque cursors**: each store brings its own cursor type, passed back
//!   unmodified and never inspected
//! - **Explicit state machine**: `Idle`, `LoadingInitial`, `Ready`,
//!   `LoadingMore`, `Exhausted`, `Failed` with at most one fetch in flight
//! - **Recoverable failures**: fetched posts and the last good cursor survive
//!   a failed page, and retry is always caller-initiated
//! - **Firestore REST adapter**: ordered `runQuery` paging, single document
//!   lookup, full scan
//! - **Media URLs**: passthrough or Cloudinary transformation URLs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quiet_thoughts::{MemoryStore, Paginator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(MemoryStore::with_generated(23));
//!     let paginator = Paginator::new(store, 10);
//!
//!     paginator.load_initial().await;
//!     while paginator.trigger_enabled().await {
//!         paginator.load_more().await;
//!     }
//!     assert_eq!(paginator.posts().await.len(), 23);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │   Scroll Trigger  (sentinel visibility → load_more)            │
//! └───────────────────────────────┬────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┴────────────────────────────────┐
//! │   Paginator  (state machine, cursor, single flight)            │
//! │   Feed Assembler  (concatenate pages, render FeedView)         │
//! └───────────────────────────────┬────────────────────────────────┘
//!                                 │
//! ┌──────────────────┬────────────┴───────┬────────────────────────┐
//! │  Store Adapter   │   Media Resolver   │   Like Store           │
//! ├──────────────────┼────────────────────┼────────────────────────┤
//! │  Firestore REST  │   Passthrough      │   Memory               │
//! │  Memory          │   Cloudinary       │   JSON file            │
//! └──────────────────┴────────────────────┴────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document wire-type fields and enum variants, then drop this

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Post records, display projection and detail addressing
pub mod post;

/// Media URL resolution
pub mod media;

/// HTTP client with rate limiting
pub mod http;

/// Remote post store adapters
pub mod store;

/// Pagination state machine and async paginator
pub mod pagination;

/// Feed assembly and view model
pub mod feed;

/// Scroll trigger
pub mod trigger;

/// Local like state
pub mod likes;

/// Application configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::AppConfig;
pub use feed::{DuplicatePolicy, FeedAssembler, FeedView, Footer, RetryAction};
pub use likes::{FileStorage, KeyValueStorage, LikeStore, MemoryStorage};
pub use media::{CloudinaryResolver, MediaResolver, PassthroughResolver};
pub use pagination::{LoadOutcome, PaginationState, Paginator};
pub use post::{DisplayPost, Post};
pub use store::{FirestoreConfig, FirestoreStore, MemoryStore, PageResult, PostStore};
pub use trigger::{attach, ScrollTrigger, TriggerConfig, TriggerHandle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
