//! Synchronous pagination state machine
//!
//! Every transition happens here; the only suspension point (the store call)
//! lives outside, between [`PaginationMachine::begin_initial`] /
//! [`PaginationMachine::begin_more`] and [`PaginationMachine::finish`].

use super::types::{Begin, FetchTicket, LoadKind, LoadOutcome, PaginationState};
use crate::error::{Error, Result};
use crate::feed::{DuplicatePolicy, FeedAssembler, FeedView};
use crate::post::DisplayPost;
use crate::store::PageResult;
use tracing::{debug, warn};

/// Pagination state, cursor and displayed posts of one feed session
#[derive(Debug)]
pub struct PaginationMachine<C> {
    state: PaginationState,
    cursor: Option<C>,
    feed: FeedAssembler,
    page_size: u32,
    epoch: u64,
    closed: bool,
}

impl<C: Clone> PaginationMachine<C> {
    /// Create an idle machine
    pub fn new(page_size: u32) -> Self {
        Self::with_policy(page_size, DuplicatePolicy::default())
    }

    /// Create an idle machine with a duplicate policy
    pub fn with_policy(page_size: u32, policy: DuplicatePolicy) -> Self {
        Self {
            state: PaginationState::Idle,
            cursor: None,
            feed: FeedAssembler::new(policy),
            page_size,
            epoch: 0,
            closed: false,
        }
    }

    /// Accept `load_initial` if valid from the current state.
    ///
    /// Valid from `Idle`, and from `Failed` when the failure came from an
    /// initial load or nothing is displayed yet.
    pub fn begin_initial(&mut self) -> Begin<C> {
        if self.closed {
            return Begin::Skip(LoadOutcome::Ignored);
        }

        let accepted = match self.state {
            PaginationState::Idle => true,
            PaginationState::Failed { retry, .. } => {
                retry == LoadKind::Initial || self.feed.is_empty()
            }
            _ => false,
        };
        if !accepted {
            debug!("load_initial ignored in state {}", self.state.name());
            return Begin::Skip(LoadOutcome::Ignored);
        }

        self.transition(PaginationState::LoadingInitial);
        Begin::Fetch(FetchTicket {
            kind: LoadKind::Initial,
            after: None,
            page_size: self.page_size,
            epoch: self.epoch,
        })
    }

    /// Accept `load_more` if valid from the current state.
    ///
    /// Valid from `Ready { has_more: true }`, and from `Failed` after a
    /// `load_more` failure, resuming from the last good cursor. Ignored in
    /// every other state, which keeps at most one fetch in flight.
    pub fn begin_more(&mut self) -> Begin<C> {
        if self.closed {
            return Begin::Skip(LoadOutcome::Ignored);
        }

        let accepted = match self.state {
            PaginationState::Ready { has_more } => has_more,
            PaginationState::Failed { retry, .. } => retry == LoadKind::More,
            _ => false,
        };
        if !accepted {
            debug!("load_more ignored in state {}", self.state.name());
            return Begin::Skip(LoadOutcome::Ignored);
        }

        let Some(after) = self.cursor.clone() else {
            let err = Error::invalid_cursor("no cursor stored for the next page");
            warn!("{err}");
            let message = err.user_message();
            self.transition(PaginationState::Failed {
                message: message.clone(),
                retry: LoadKind::More,
            });
            return Begin::Skip(LoadOutcome::Failed { message });
        };

        self.transition(PaginationState::LoadingMore);
        Begin::Fetch(FetchTicket {
            kind: LoadKind::More,
            after: Some(after),
            page_size: self.page_size,
            epoch: self.epoch,
        })
    }

    /// Apply the result of a fetch started by `begin_*`
    pub fn finish(
        &mut self,
        ticket: FetchTicket<C>,
        result: Result<PageResult<C>>,
    ) -> LoadOutcome {
        if ticket.epoch != self.epoch {
            warn!(
                "Discarding {} page result from session {} (current session {})",
                ticket.kind, ticket.epoch, self.epoch
            );
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(page) => {
                if ticket.kind == LoadKind::Initial {
                    self.feed.clear();
                }
                let has_more = page.has_more;
                if let Some(cursor) = page.cursor {
                    self.cursor = Some(cursor);
                }
                let added = self.feed.append(page.posts);

                self.transition(if has_more {
                    PaginationState::Ready { has_more: true }
                } else {
                    PaginationState::Exhausted
                });
                LoadOutcome::Loaded { added, has_more }
            }
            Err(err) => {
                let message = err.user_message();
                warn!("load_{} failed: {}", ticket.kind, message);
                self.transition(PaginationState::Failed {
                    message: message.clone(),
                    retry: ticket.kind,
                });
                LoadOutcome::Failed { message }
            }
        }
    }

    /// Start a new session: back to `Idle` with nothing displayed.
    ///
    /// Fetches still in flight belong to the old session and are discarded
    /// when they finish.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.cursor = None;
        self.feed.clear();
        self.transition(PaginationState::Idle);
    }

    /// Tear the session down; every later call is ignored
    pub fn close(&mut self) {
        self.epoch += 1;
        self.closed = true;
        debug!("Pagination session closed");
    }

    /// Current state
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Displayed posts
    pub fn posts(&self) -> &[DisplayPost] {
        self.feed.posts()
    }

    /// Assembler holding the displayed posts
    pub fn feed(&self) -> &FeedAssembler {
        &self.feed
    }

    /// Cursor of the last post of the newest page
    pub fn cursor(&self) -> Option<&C> {
        self.cursor.as_ref()
    }

    /// Requested page size
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Current session epoch
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Check if the session was closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the scroll trigger should be listening
    pub fn trigger_enabled(&self) -> bool {
        !self.closed && self.state.can_load_more()
    }

    /// Render the current view
    pub fn view(&self) -> FeedView {
        FeedView::render(&self.state, self.feed.posts())
    }

    fn transition(&mut self, next: PaginationState) {
        debug!("Pagination {} -> {}", self.state.name(), next.name());
        self.state = next;
    }
}
