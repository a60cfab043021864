//! Pagination types
//!
//! Defines the tagged pagination state and the values exchanged between the
//! state machine and its async driver.

use serde::Serialize;
use std::fmt;

/// Which operation started a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadKind {
    /// `load_initial`
    Initial,
    /// `load_more`
    More,
}

impl fmt::Display for LoadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::More => write!(f, "more"),
        }
    }
}

/// Pagination state for one feed session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PaginationState {
    /// Nothing loaded yet
    #[default]
    Idle,
    /// First page in flight
    LoadingInitial,
    /// Page landed, more may follow
    Ready {
        /// Whether the last page came back full
        has_more: bool,
    },
    /// Follow-up page in flight
    LoadingMore,
    /// A short page was seen, nothing more to fetch
    Exhausted,
    /// Last fetch failed
    Failed {
        /// Human-readable failure message
        message: String,
        /// Operation that failed, and that a retry re-invokes
        retry: LoadKind,
    },
}

impl PaginationState {
    /// Check if a fetch is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::LoadingInitial | Self::LoadingMore)
    }

    /// Check if `load_more` would issue a fetch
    pub fn can_load_more(&self) -> bool {
        matches!(self, Self::Ready { has_more: true })
    }

    /// Check if the session is exhausted
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Check if the last fetch failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Short state name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LoadingInitial => "loading_initial",
            Self::Ready { .. } => "ready",
            Self::LoadingMore => "loading_more",
            Self::Exhausted => "exhausted",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Permission to run one store fetch.
///
/// Issued by [`PaginationMachine`](super::PaginationMachine) when a load is
/// accepted and handed back with the result. The ticket remembers the session
/// epoch it was issued in, so results arriving after a reset are recognized.
#[derive(Debug, Clone)]
pub struct FetchTicket<C> {
    pub(crate) kind: LoadKind,
    pub(crate) after: Option<C>,
    pub(crate) page_size: u32,
    pub(crate) epoch: u64,
}

impl<C> FetchTicket<C> {
    /// Operation that issued the ticket
    pub fn kind(&self) -> LoadKind {
        self.kind
    }

    /// Cursor to pass to the store
    pub fn after(&self) -> Option<&C> {
        self.after.as_ref()
    }

    /// Page size to request
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Session epoch the ticket belongs to
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Result of a `load_initial` / `load_more` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadOutcome {
    /// A page was appended
    Loaded {
        /// Posts added to the feed
        added: usize,
        /// Whether another page may follow
        has_more: bool,
    },
    /// The fetch failed and the state is now `Failed`
    Failed {
        /// Human-readable failure message
        message: String,
    },
    /// The call was not valid in the current state and did nothing
    Ignored,
    /// The fetch finished after a reset or close and its result was dropped
    Discarded,
}

impl LoadOutcome {
    /// Check if a page was appended
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    /// Check if the call was a no-op
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// What a `begin_*` call decided
#[derive(Debug)]
pub enum Begin<C> {
    /// Run this fetch, then hand the result to `finish`
    Fetch(FetchTicket<C>),
    /// No fetch, the outcome is already known
    Skip(LoadOutcome),
}
