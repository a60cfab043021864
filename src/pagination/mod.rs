//! Pagination module
//!
//! Cursor-based paging of the post feed with at most one fetch in flight.
//!
//! # Overview
//!
//! - `PaginationState` - `Idle`, `LoadingInitial`, `Ready`, `LoadingMore`,
//!   `Exhausted`, `Failed`
//! - `PaginationMachine` - synchronous guarded transitions, cursor and posts
//! - `Paginator` - async driver calling a `PostStore` between transitions
//!
//! The paginator never returns an error. Failures land in `Failed`, keep the
//! displayed posts and the last good cursor, and are retried by re-invoking
//! the operation that failed.

mod machine;
mod paginator;
mod types;

pub use machine::PaginationMachine;
pub use paginator::Paginator;
pub use types::{Begin, FetchTicket, LoadKind, LoadOutcome, PaginationState};
