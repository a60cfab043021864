//! Feed assembly module
//!
//! Merges pages into the displayed list and derives what the feed renders.
//!
//! # Overview
//!
//! - `FeedAssembler` - concatenates pages in fetch order, detecting repeated ids
//! - `DuplicatePolicy` - keep or skip repeated ids
//! - `FeedView` - loading / empty / failed-with-retry / posts-with-footer

mod assembler;
mod view;

pub use assembler::{DuplicatePolicy, FeedAssembler};
pub use view::{FeedView, Footer, RetryAction};
