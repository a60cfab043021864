//! Presentation model of the feed

use crate::pagination::{LoadKind, PaginationState};
use crate::post::DisplayPost;
use serde::Serialize;

/// Operation a retry affordance re-invokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryAction {
    /// Re-run the first page fetch
    LoadInitial,
    /// Re-run the follow-up fetch from the last good cursor
    LoadMore,
}

impl From<LoadKind> for RetryAction {
    fn from(kind: LoadKind) -> Self {
        match kind {
            LoadKind::Initial => Self::LoadInitial,
            LoadKind::More => Self::LoadMore,
        }
    }
}

/// What is rendered below the last post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Footer {
    /// Sentinel only, waiting for the trigger
    Idle,
    /// Inline loading indicator
    LoadingMore,
    /// End-of-feed marker
    Exhausted,
    /// Inline error with a retry button
    Retry {
        /// Failure message
        message: String,
        /// Operation the button re-invokes
        action: RetryAction,
    },
}

/// Everything the feed renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum FeedView {
    /// First page not loaded yet
    Loading,
    /// The store holds no posts
    Empty,
    /// Nothing to show and the last fetch failed
    Failed {
        /// Failure message
        message: String,
        /// Operation the retry button re-invokes
        retry: RetryAction,
    },
    /// Posts in display order plus a footer
    Posts {
        /// Displayed posts
        posts: Vec<DisplayPost>,
        /// Footer below the list
        footer: Footer,
    },
}

impl FeedView {
    /// Derive the view from pagination state and the displayed posts
    pub fn render(state: &PaginationState, posts: &[DisplayPost]) -> Self {
        if posts.is_empty() {
            return match state {
                PaginationState::Idle
                | PaginationState::LoadingInitial
                | PaginationState::LoadingMore => Self::Loading,
                PaginationState::Ready { .. } | PaginationState::Exhausted => Self::Empty,
                PaginationState::Failed { message, .. } => Self::Failed {
                    message: message.clone(),
                    retry: RetryAction::LoadInitial,
                },
            };
        }

        let footer = match state {
            PaginationState::Idle | PaginationState::Ready { has_more: true } => Footer::Idle,
            PaginationState::LoadingInitial | PaginationState::LoadingMore => Footer::LoadingMore,
            PaginationState::Ready { has_more: false } | PaginationState::Exhausted => {
                Footer::Exhausted
            }
            PaginationState::Failed { message, retry } => Footer::Retry {
                message: message.clone(),
                action: RetryAction::from(*retry),
            },
        };

        Self::Posts {
            posts: posts.to_vec(),
            footer,
        }
    }

    /// Displayed posts, empty for every non-list view
    pub fn posts(&self) -> &[DisplayPost] {
        match self {
            Self::Posts { posts, .. } => posts,
            _ => &[],
        }
    }

    /// Retry action offered by this view, if any
    pub fn retry_action(&self) -> Option<RetryAction> {
        match self {
            Self::Failed { retry, .. } => Some(*retry),
            Self::Posts {
                footer: Footer::Retry { action, .. },
                ..
            } => Some(*action),
            _ => None,
        }
    }
}
