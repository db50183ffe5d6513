//! Single-photo detail page state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, warn};

use crate::feed::{Completion, FetchJob, FetchQueue};
use crate::models::PhotoDetail;
use crate::source::{PhotoSource, SourceError};
use crate::view::DetailView;

/// Prefix of the user-facing message for a failed detail fetch.
pub const DETAIL_ERROR_PREFIX: &str = "Error fetching photo: ";

/// A detail fetch the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    pub generation: u64,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailOutcome {
    pub ticket: DetailTicket,
    pub result: Result<Option<PhotoDetail>, SourceError>,
}

/// Exactly one of these is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Loading,
    Error(String),
    NotFound,
    Loaded(PhotoDetail),
}

impl DetailState {
    pub fn from_result(result: Result<Option<PhotoDetail>, SourceError>) -> Self {
        match result {
            Ok(Some(detail)) => Self::Loaded(detail),
            Ok(None) => Self::NotFound,
            Err(err) => Self::Error(format!("{DETAIL_ERROR_PREFIX}{}", err.message())),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Tracks which photo is open and drops answers for photos no longer open.
#[derive(Debug, Default)]
pub struct DetailController {
    id: Option<String>,
    generation: u64,
    state: DetailState,
}

impl DetailController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Show `id`. Always re-fetches, even if it is already open.
    pub fn open(&mut self, id: &str) -> DetailTicket {
        self.generation = self.generation.wrapping_add(1);
        self.id = Some(id.to_string());
        self.state = DetailState::Loading;
        debug!(id, generation = self.generation, "Opening photo");
        DetailTicket {
            generation: self.generation,
            id: id.to_string(),
        }
    }

    /// Returns false if the outcome was stale and ignored.
    pub fn apply(&mut self, outcome: DetailOutcome) -> bool {
        if outcome.ticket.generation != self.generation {
            debug!(id = %outcome.ticket.id, "Dropping stale detail");
            return false;
        }
        if let Err(err) = &outcome.result {
            warn!(id = %outcome.ticket.id, error = %err, "Detail fetch failed");
        }
        self.state = DetailState::from_result(outcome.result);
        true
    }
}

/// Detail controller wired to a fetch queue.
pub struct DetailSession {
    controller: DetailController,
    queue: FetchQueue,
}

impl DetailSession {
    pub fn new(source: Arc<dyn PhotoSource>) -> Result<Self> {
        Ok(Self {
            controller: DetailController::new(),
            queue: FetchQueue::new(source, 1)?,
        })
    }

    pub fn open(&mut self, id: &str) {
        let ticket = self.controller.open(id);
        self.queue.submit(FetchJob::Detail(ticket));
    }

    pub fn state(&self) -> &DetailState {
        self.controller.state()
    }

    /// Apply finished fetches. Returns true if the state changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        for completion in self.queue.poll() {
            changed |= self.handle(completion);
        }
        changed
    }

    /// Block until the queue is idle or `timeout` elapses.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.queue.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            if let Some(completion) = self.queue.wait(remaining) {
                self.handle(completion);
            }
        }
        true
    }

    fn handle(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Detail(outcome) => self.controller.apply(outcome),
            Completion::Page(_) => false,
        }
    }

    pub fn view(&self) -> DetailView {
        DetailView::from_state(self.controller.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhotoSummary;
    use crate::source::{ScriptedSource, SourceCall};

    fn sample_detail(id: &str) -> PhotoDetail {
        PhotoDetail {
            summary: PhotoSummary::new(id, 4000, 3000).with_regular("https://images.example/full"),
            description: Some("Fog over the lake".into()),
            photographer: "Ada Example".into(),
            created_at: "2023-05-04T10:00:00Z".into(),
        }
    }

    #[test]
    fn test_from_result() {
        assert_eq!(DetailState::from_result(Ok(None)), DetailState::NotFound);
        assert_eq!(
            DetailState::from_result(Err(SourceError::Network("timeout".into()))),
            DetailState::Error("Error fetching photo: timeout".into())
        );
        let detail = sample_detail("a");
        assert_eq!(
            DetailState::from_result(Ok(Some(detail.clone()))),
            DetailState::Loaded(detail)
        );
    }

    #[test]
    fn test_open_starts_loading() {
        let mut controller = DetailController::new();
        let ticket = controller.open("abc");
        assert_eq!(ticket.id, "abc");
        assert!(controller.state().is_loading());
        assert_eq!(controller.id(), Some("abc"));
    }

    #[test]
    fn test_stale_detail_is_ignored() {
        let mut controller = DetailController::new();
        let first = controller.open("a");
        let second = controller.open("b");

        assert!(!controller.apply(DetailOutcome {
            ticket: first,
            result: Ok(Some(sample_detail("a"))),
        }));
        assert!(controller.state().is_loading());

        assert!(controller.apply(DetailOutcome {
            ticket: second,
            result: Ok(None),
        }));
        assert_eq!(controller.state(), &DetailState::NotFound);
    }

    #[test]
    fn test_session_loads_detail() {
        let source = Arc::new(ScriptedSource::new());
        source.on_detail("abc", Ok(Some(sample_detail("abc"))));
        let mut session = DetailSession::new(source.clone()).unwrap();

        session.open("abc");
        assert!(session.wait_idle(Duration::from_secs(5)));
        assert_eq!(session.state(), &DetailState::Loaded(sample_detail("abc")));
        assert_eq!(source.calls(), vec![SourceCall::Detail { id: "abc".into() }]);
    }

    #[test]
    fn test_session_missing_photo_is_not_an_error() {
        let source = Arc::new(ScriptedSource::new());
        let mut session = DetailSession::new(source).unwrap();

        session.open("nope");
        assert!(session.wait_idle(Duration::from_secs(5)));
        assert_eq!(session.state(), &DetailState::NotFound);
    }
}
