//! Async paginator over a post store

use super::machine::PaginationMachine;
use super::types::{Begin, LoadOutcome, PaginationState};
use crate::feed::{DuplicatePolicy, FeedView, RetryAction};
use crate::post::DisplayPost;
use crate::store::PostStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Drives a [`PaginationMachine`] against a [`PostStore`].
///
/// The machine lock is held only around transitions, never across the store
/// call, so state can be read while a page is in flight. Calls that arrive
/// while a fetch is outstanding return [`LoadOutcome::Ignored`].
#[derive(Debug)]
pub struct Paginator<S: PostStore> {
    store: Arc<S>,
    machine: Mutex<PaginationMachine<S::Cursor>>,
}

impl<S: PostStore> Paginator<S> {
    /// Create a paginator with the default duplicate policy
    pub fn new(store: Arc<S>, page_size: u32) -> Self {
        Self::with_policy(store, page_size, DuplicatePolicy::default())
    }

    /// Create a paginator with a duplicate policy
    pub fn with_policy(store: Arc<S>, page_size: u32, policy: DuplicatePolicy) -> Self {
        Self {
            store,
            machine: Mutex::new(PaginationMachine::with_policy(page_size, policy)),
        }
    }

    /// Fetch the first page
    pub async fn load_initial(&self) -> LoadOutcome {
        let begin = self.machine.lock().await.begin_initial();
        self.run(begin).await
    }

    /// Fetch the page after the stored cursor
    pub async fn load_more(&self) -> LoadOutcome {
        let begin = self.machine.lock().await.begin_more();
        self.run(begin).await
    }

    /// Re-invoke the operation behind a retry affordance
    pub async fn retry(&self, action: RetryAction) -> LoadOutcome {
        match action {
            RetryAction::LoadInitial => self.load_initial().await,
            RetryAction::LoadMore => self.load_more().await,
        }
    }

    /// Start a new session from the first page
    pub async fn reset(&self) {
        self.machine.lock().await.reset();
    }

    /// Tear the session down; in-flight results are dropped on arrival
    pub async fn close(&self) {
        self.machine.lock().await.close();
    }

    /// Current state
    pub async fn state(&self) -> PaginationState {
        self.machine.lock().await.state().clone()
    }

    /// Displayed posts
    pub async fn posts(&self) -> Vec<DisplayPost> {
        self.machine.lock().await.posts().to_vec()
    }

    /// Current view
    pub async fn view(&self) -> FeedView {
        self.machine.lock().await.view()
    }

    /// Whether the scroll trigger should be listening
    pub async fn trigger_enabled(&self) -> bool {
        self.machine.lock().await.trigger_enabled()
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    async fn run(&self, begin: Begin<S::Cursor>) -> LoadOutcome {
        let ticket = match begin {
            Begin::Fetch(ticket) => ticket,
            Begin::Skip(outcome) => return outcome,
        };

        debug!(
            "Fetching {} page (size {}, session {})",
            ticket.kind(),
            ticket.page_size(),
            ticket.epoch()
        );
        let result = self
            .store
            .fetch_page(ticket.page_size(), ticket.after())
            .await;

        self.machine.lock().await.finish(ticket, result)
    }
}
