//! The grid screen's event loop state.
//!
//! Owns the pagination controller and the fetch queue, tracks container
//! geometry and scroll position, and derives the view model on demand:
//! `FeedState -> ColumnAssignment -> VisibleSet -> GridView`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info};

use super::controller::{Applied, FetchTicket, PaginationController, DEFAULT_PER_PAGE};
use super::prefetch::{ScrollMetrics, ScrollPrefetcher};
use super::queue::{Completion, FetchJob, FetchQueue, DEFAULT_WORKERS};
use crate::config::Config;
use crate::layout::{CachedLayoutComputer, LayoutGeometry, MasonryLayout, Viewport, Virtualizer};
use crate::models::{ColumnAssignment, FeedState};
use crate::source::PhotoSource;
use crate::view::GridView;

/// Tunables for a feed session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub per_page: u32,
    pub layout: MasonryLayout,
    pub buffer_multiplier: f64,
    pub prefetch_margin: f64,
    pub fetch_workers: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            layout: MasonryLayout::default(),
            buffer_multiplier: Virtualizer::default().buffer_multiplier,
            prefetch_margin: ScrollPrefetcher::default().margin,
            fetch_workers: DEFAULT_WORKERS,
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            per_page: config.per_page,
            layout: MasonryLayout {
                base_column_width: config.base_column_width,
                gutter: config.gutter,
                gap: config.gap,
                ..MasonryLayout::default()
            },
            buffer_multiplier: config.buffer_multiplier,
            prefetch_margin: config.prefetch_margin,
            fetch_workers: config.fetch_workers,
        }
    }
}

pub struct FeedSession {
    controller: PaginationController,
    queue: FetchQueue,
    layout: CachedLayoutComputer,
    geometry: LayoutGeometry,
    viewport: Viewport,
    prefetcher: ScrollPrefetcher,
    virtualizer: Virtualizer,
    search_text: String,
}

impl FeedSession {
    pub fn new(source: Arc<dyn PhotoSource>, options: SessionOptions) -> Result<Self> {
        let layout = CachedLayoutComputer::with_layout(options.layout);
        let geometry = layout.layout.compute_layout(0.0, 0.0);
        Ok(Self {
            controller: PaginationController::new(options.per_page),
            queue: FetchQueue::new(source, options.fetch_workers)?,
            layout,
            geometry,
            viewport: Viewport::default(),
            prefetcher: ScrollPrefetcher::new(options.prefetch_margin),
            virtualizer: Virtualizer::new(options.buffer_multiplier),
            search_text: String::new(),
        })
    }

    pub fn state(&self) -> &FeedState {
        self.controller.state()
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        &self.geometry
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Start the first browse page. Only the first call does anything.
    pub fn mount(&mut self) -> bool {
        info!("Feed mounted");
        let ticket = self.controller.request_initial_load();
        self.dispatch(ticket)
    }

    /// Container size changed.
    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        let geometry = self.layout.layout.compute_layout(width_px, height_px);
        if geometry != self.geometry {
            debug!(
                columns = geometry.column_count,
                column_width = geometry.column_width_px,
                "Layout geometry changed"
            );
        }
        self.geometry = geometry;
        self.viewport.height_px = geometry.container_height_px;
    }

    /// Scroll to `scroll_top_px`, measuring the content from the current
    /// layout. Returns true if a page fetch was started.
    pub fn scroll(&mut self, scroll_top_px: f64) -> bool {
        let scroll_height_px = self.assignment().content_height();
        self.scroll_with_metrics(ScrollMetrics {
            scroll_top_px,
            scroll_height_px,
            client_height_px: self.viewport.height_px,
        })
    }

    /// Scroll with measurements taken by the host widget.
    pub fn scroll_with_metrics(&mut self, metrics: ScrollMetrics) -> bool {
        self.viewport.scroll_top_px = metrics.scroll_top_px;
        self.viewport.height_px = metrics.client_height_px;
        let ticket = self.prefetcher.on_scroll(&metrics, &mut self.controller);
        self.dispatch(ticket)
    }

    /// Controlled input: update the text without searching.
    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
    }

    /// Search for `query`; blank queries go back to browsing.
    pub fn submit_search(&mut self, query: &str) {
        self.search_text = query.to_string();
        let ticket = self.controller.submit_search(query);
        self.dispatch(Some(ticket));
    }

    /// Submit whatever is currently in the search box.
    pub fn submit_current_search(&mut self) {
        let query = self.search_text.clone();
        self.submit_search(&query);
    }

    fn dispatch(&mut self, ticket: Option<FetchTicket>) -> bool {
        match ticket {
            Some(ticket) => self.queue.submit(FetchJob::Page(ticket)),
            None => false,
        }
    }

    /// Apply finished fetches. Returns the number that changed state.
    pub fn pump(&mut self) -> usize {
        let mut changed = 0;
        for completion in self.queue.poll() {
            if self.handle(completion) {
                changed += 1;
            }
        }
        changed
    }

    /// Block until every submitted fetch has been applied, or `timeout`
    /// elapses. Returns false on timeout.
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
            Completion::Page(outcome) => self.controller.apply(outcome) != Applied::Stale,
            Completion::Detail(outcome) => {
                debug!(id = %outcome.ticket.id, "Ignoring detail completion in feed");
                false
            }
        }
    }

    /// Column assignment for the current items and geometry (memoized).
    pub fn assignment(&self) -> Arc<ColumnAssignment> {
        self.layout.compute(
            &self.controller.state().items,
            self.controller.revision(),
            &self.geometry,
        )
    }

    pub fn view(&self) -> GridView {
        let assignment = self.assignment();
        let visible = self.virtualizer.visible(&assignment, &self.viewport);
        GridView::build(
            self.controller.state(),
            &self.search_text,
            &assignment,
            &visible,
        )
    }
}
