//! Pagination state machine for the photo feed.
//!
//! The controller never performs I/O. Operations that need a fetch return a
//! [`FetchTicket`]; the caller runs it (see [`FetchQueue`](super::FetchQueue))
//! and hands the [`FetchOutcome`] back to [`PaginationController::apply`].
//!
//! Two guards keep the state consistent:
//! - single flight: no new page is requested while `loading` is set
//! - stale responses: every ticket carries the request generation current
//!   when it was issued; a reset (new search) bumps the generation, and
//!   outcomes from an older generation are dropped without touching state
//!
//! [`PaginationController::revision`] changes whenever the item list does,
//! so layout memos can key on it instead of hashing the list.

use tracing::{debug, warn};

use crate::models::{FeedMode, FeedState, FeedStatus, PhotoSummary};
use crate::source::{PhotoSource, SourceError};

/// Prefix of the user-facing message for failed feed fetches.
pub const FETCH_ERROR_PREFIX: &str = "Error fetching photos: ";

/// Photos requested per page (default).
pub const DEFAULT_PER_PAGE: u32 = 100;

/// A page fetch the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub mode: FeedMode,
    pub page: u32,
    pub per_page: u32,
    /// Replace the item list instead of appending.
    pub reset: bool,
}

impl FetchTicket {
    /// Run the ticket against a source (blocking).
    pub fn run(&self, source: &dyn PhotoSource) -> Result<Vec<PhotoSummary>, SourceError> {
        match &self.mode {
            FeedMode::Browse => source.list_page(self.page, self.per_page),
            FeedMode::Search(query) => source.search_page(query, self.page, self.per_page),
        }
    }
}

/// Completed page fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub ticket: FetchTicket,
    pub result: Result<Vec<PhotoSummary>, SourceError>,
}

/// What `apply` did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Items were appended (or replaced on reset).
    Page { received: usize },
    /// Empty page: the current mode has no more pages.
    Exhausted,
    /// The fetch failed; `last_error` holds the message.
    Failed,
    /// Outcome belonged to an older generation and was dropped.
    Stale,
}

pub struct PaginationController {
    state: FeedState,
    per_page: u32,
    generation: u64,
    revision: u64,
    initialized: bool,
}

impl PaginationController {
    pub fn new(per_page: u32) -> Self {
        Self {
            state: FeedState::default(),
            per_page: per_page.max(1),
            generation: 0,
            revision: 0,
            initialized: false,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn status(&self) -> FeedStatus {
        self.state.status()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bumped on every change to `state().items`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// First browse page, once per controller lifetime.
    pub fn request_initial_load(&mut self) -> Option<FetchTicket> {
        if self.initialized {
            debug!("Initial load already requested");
            return None;
        }
        self.initialized = true;
        Some(self.issue_ticket(false))
    }

    /// Next page of the current mode, unless a fetch is in flight or the
    /// mode is exhausted.
    pub fn request_next_page(&mut self) -> Option<FetchTicket> {
        if !self.state.can_fetch_more() {
            return None;
        }
        self.initialized = true;
        Some(self.issue_ticket(false))
    }

    /// Switch to the mode for `query` and fetch its first page.
    ///
    /// Items, cursor and exhaustion are reset immediately and the generation
    /// is bumped, so any fetch still in flight becomes stale.
    pub fn submit_search(&mut self, query: &str) -> FetchTicket {
        let mode = FeedMode::from_query(query);
        debug!(?mode, "Search submitted");

        self.generation = self.generation.wrapping_add(1);
        self.revision = self.revision.wrapping_add(1);
        self.initialized = true;
        self.state = FeedState {
            mode,
            ..FeedState::default()
        };
        self.issue_ticket(true)
    }

    fn issue_ticket(&mut self, reset: bool) -> FetchTicket {
        self.state.loading = true;
        self.state.last_error = None;
        let ticket = FetchTicket {
            generation: self.generation,
            mode: self.state.mode.clone(),
            page: if reset { 1 } else { self.state.next_page },
            per_page: self.per_page,
            reset,
        };
        debug!(
            generation = ticket.generation,
            page = ticket.page,
            reset,
            mode = ?ticket.mode,
            "Issued page fetch"
        );
        ticket
    }

    /// Fold a completed fetch into the state.
    pub fn apply(&mut self, outcome: FetchOutcome) -> Applied {
        let FetchOutcome { ticket, result } = outcome;

        if ticket.generation != self.generation {
            debug!(
                stale_generation = ticket.generation,
                current_generation = self.generation,
                "Dropping stale page"
            );
            return Applied::Stale;
        }

        self.state.loading = false;

        match result {
            Ok(photos) if photos.is_empty() => {
                debug!(page = ticket.page, "Feed exhausted");
                if ticket.reset {
                    self.state.items.clear();
                }
                self.state.exhausted = true;
                Applied::Exhausted
            }
            Ok(photos) => {
                let received = photos.len();
                if ticket.reset {
                    self.state.items = photos;
                } else {
                    self.state.items.extend(photos);
                }
                self.revision = self.revision.wrapping_add(1);
                self.state.next_page = ticket.page + 1;
                debug!(
                    received,
                    total = self.state.items.len(),
                    next_page = self.state.next_page,
                    "Page applied"
                );
                Applied::Page { received }
            }
            Err(err) => {
                warn!(page = ticket.page, error = %err, "Page fetch failed");
                self.state.last_error = Some(format!("{FETCH_ERROR_PREFIX}{}", err.message()));
                Applied::Failed
            }
        }
    }
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}
