use tracing::trace;

use super::controller::{FetchTicket, PaginationController};
use crate::models::FeedState;

/// Scroll measurements of the grid container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top_px: f64,
    /// Total scrollable content height.
    pub scroll_height_px: f64,
    /// Visible height of the container.
    pub client_height_px: f64,
}

impl ScrollMetrics {
    /// Distance from the current scroll offset to the end of the content.
    pub fn remaining_px(&self) -> f64 {
        self.scroll_height_px - self.scroll_top_px
    }
}

/// Requests the next page when the user nears the end of the content.
#[derive(Debug, Clone)]
pub struct ScrollPrefetcher {
    /// Extra viewport heights of slack before triggering (default: 0.5)
    pub margin: f64,
}

impl Default for ScrollPrefetcher {
    fn default() -> Self {
        Self { margin: 0.5 }
    }
}

impl ScrollPrefetcher {
    pub fn new(margin: f64) -> Self {
        Self {
            margin: margin.max(0.0),
        }
    }

    pub fn threshold_px(&self, metrics: &ScrollMetrics) -> f64 {
        metrics.client_height_px * (1.0 + self.margin)
    }

    pub fn should_prefetch(&self, metrics: &ScrollMetrics, state: &FeedState) -> bool {
        metrics.remaining_px() <= self.threshold_px(metrics) && state.can_fetch_more()
    }

    /// Ask the controller for the next page if the scroll position calls
    /// for it. The controller's own guards still apply.
    pub fn on_scroll(
        &self,
        metrics: &ScrollMetrics,
        controller: &mut PaginationController,
    ) -> Option<FetchTicket> {
        if !self.should_prefetch(metrics, controller.state()) {
            return None;
        }
        trace!(
            remaining = metrics.remaining_px(),
            threshold = self.threshold_px(metrics),
            "Near end of feed, requesting next page"
        );
        controller.request_next_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::controller::FetchOutcome;
    use crate::models::FeedMode;
    use crate::source::scripted::uniform_photos;

    fn metrics(scroll_top: f64, scroll_height: f64, client_height: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top_px: scroll_top,
            scroll_height_px: scroll_height,
            client_height_px: client_height,
        }
    }

    fn loaded_controller() -> PaginationController {
        let mut controller = PaginationController::default();
        let ticket = controller.request_initial_load().unwrap();
        controller.apply(FetchOutcome {
            ticket,
            result: Ok(uniform_photos("p", 10, 1, 1)),
        });
        controller
    }

    #[test]
    fn test_threshold_is_one_and_a_half_viewports() {
        let prefetcher = ScrollPrefetcher::default();
        let state = FeedState::default();
        // remaining 1500 == 1.5 * 1000
        assert!(prefetcher.should_prefetch(&metrics(3500.0, 5000.0, 1000.0), &state));
        assert!(!prefetcher.should_prefetch(&metrics(3499.0, 5000.0, 1000.0), &state));
    }

    #[test]
    fn test_scroll_near_end_requests_next_page() {
        let prefetcher = ScrollPrefetcher::default();
        let mut controller = loaded_controller();

        assert!(prefetcher
            .on_scroll(&metrics(0.0, 10_000.0, 800.0), &mut controller)
            .is_none());

        let ticket = prefetcher
            .on_scroll(&metrics(9_000.0, 10_000.0, 800.0), &mut controller)
            .unwrap();
        assert_eq!(ticket.page, 2);
        assert_eq!(ticket.mode, FeedMode::Browse);
    }

    #[test]
    fn test_repeated_scroll_does_not_stack_fetches() {
        let prefetcher = ScrollPrefetcher::default();
        let mut controller = loaded_controller();
        let near_end = metrics(9_500.0, 10_000.0, 800.0);

        assert!(prefetcher.on_scroll(&near_end, &mut controller).is_some());
        assert!(prefetcher.on_scroll(&near_end, &mut controller).is_none());
        assert!(prefetcher.on_scroll(&near_end, &mut controller).is_none());
    }

    #[test]
    fn test_uses_current_search_mode() {
        let prefetcher = ScrollPrefetcher::default();
        let mut controller = PaginationController::default();
        let search = controller.submit_search("forest");
        controller.apply(FetchOutcome {
            ticket: search,
            result: Ok(uniform_photos("f", 5, 1, 1)),
        });

        let ticket = prefetcher
            .on_scroll(&metrics(0.0, 100.0, 800.0), &mut controller)
            .unwrap();
        assert_eq!(ticket.mode, FeedMode::Search("forest".into()));
        assert_eq!(ticket.page, 2);
    }

    #[test]
    fn test_exhausted_feed_never_prefetches() {
        let prefetcher = ScrollPrefetcher::default();
        let mut controller = loaded_controller();
        let ticket = controller.request_next_page().unwrap();
        controller.apply(FetchOutcome {
            ticket,
            result: Ok(Vec::new()),
        });
        assert!(prefetcher
            .on_scroll(&metrics(0.0, 0.0, 800.0), &mut controller)
            .is_none());
    }
}
