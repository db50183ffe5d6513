//! End-to-end feed behavior against a scripted photo source.

use std::sync::Arc;
use std::time::Duration;

use mosaic::feed::{FeedSession, SessionOptions};
use mosaic::models::FeedStatus;
use mosaic::source::scripted::uniform_photos;
use mosaic::source::{PhotoSource, ScriptedSource, SourceCall, SourceError};
use mosaic::view::TestId;

const WAIT: Duration = Duration::from_secs(5);

fn session_with(source: &Arc<ScriptedSource>) -> FeedSession {
    let source: Arc<dyn PhotoSource> = source.clone();
    let mut session = FeedSession::new(source, SessionOptions::default()).unwrap();
    session.resize(1200.0, 800.0);
    session
}

#[test]
fn mount_fetches_first_page_once_and_virtualizes() {
    let source = Arc::new(ScriptedSource::new());
    source.on_list(1, Ok(uniform_photos("p", 100, 800, 1000)));
    let mut session = session_with(&source);

    session.mount();
    let first = session.view();
    assert!(first.has(TestId::LoadingSpinner));
    assert_eq!(first.count(TestId::PhotoItem), 0);

    assert!(session.wait_idle(WAIT));
    let view = session.view();
    assert!(!view.has(TestId::LoadingSpinner));
    assert!(view.has(TestId::GridContainer));

    // 4 columns of 290 px; every photo is 362.5 px tall plus a 15 px gap.
    assert_eq!(view.columns.len(), 4);
    assert!(view.columns.iter().all(|c| c.width_px == 290.0));
    assert!(view.columns.iter().all(|c| c.height_px == 25.0 * 377.5));
    // Window [-4000, 4800): 13 tiles per column.
    assert_eq!(view.count(TestId::PhotoItem), 52);
    assert_eq!(session.state().items.len(), 100);

    assert_eq!(
        source.calls(),
        vec![SourceCall::List {
            page: 1,
            per_page: 100
        }]
    );
}

#[test]
fn scrolling_moves_the_mounted_window() {
    let source = Arc::new(ScriptedSource::new());
    source.on_list(1, Ok(uniform_photos("p", 100, 800, 1000)));
    let mut session = session_with(&source);
    session.mount();
    session.wait_idle(WAIT);

    assert!(!session.scroll(5000.0));
    let view = session.view();
    // Window [1000, 9800): tiles 2..25 of each column.
    assert_eq!(view.count(TestId::PhotoItem), 92);
    assert!(view.photo_items().all(|t| t.top_px + t.height_px > 1000.0));
    assert!(!view.photo_items().any(|t| t.id == "p-0"));
    assert_eq!(source.call_count(), 1);
}

#[test]
fn scrolling_to_the_end_paginates_until_exhausted() {
    let source = Arc::new(ScriptedSource::new());
    source.on_list(1, Ok(uniform_photos("a", 100, 800, 1000)));
    source.on_list(2, Ok(uniform_photos("b", 100, 800, 1000)));
    let mut session = session_with(&source);
    session.mount();
    session.wait_idle(WAIT);

    let end = session.assignment().content_height();
    assert!(session.scroll(end - 800.0));
    session.wait_idle(WAIT);
    assert_eq!(session.state().items.len(), 200);

    let end = session.assignment().content_height();
    assert!(session.scroll(end - 800.0));
    session.wait_idle(WAIT);
    assert_eq!(session.state().status(), FeedStatus::Exhausted);

    assert!(!session.scroll(end - 800.0));
    assert!(!session.scroll(end));
    assert_eq!(
        source.calls(),
        vec![
            SourceCall::List {
                page: 1,
                per_page: 100
            },
            SourceCall::List {
                page: 2,
                per_page: 100
            },
            SourceCall::List {
                page: 3,
                per_page: 100
            },
        ]
    );
}

#[test]
fn search_queries_first_page_and_continues_in_search_mode() {
    let source = Arc::new(ScriptedSource::new());
    source.on_search("mountains", 1, Ok(uniform_photos("m", 8, 600, 400)));
    let mut session = session_with(&source);

    session.set_search_text("mountains");
    session.submit_current_search();
    session.wait_idle(WAIT);

    let view = session.view();
    assert_eq!(view.count(TestId::PhotoItem), 8);
    assert_eq!(view.search_bar.text, "mountains");

    // Short content: any scroll lands near the end.
    assert!(session.scroll(0.0));
    session.wait_idle(WAIT);

    assert_eq!(
        source.calls(),
        vec![
            SourceCall::Search {
                query: "mountains".into(),
                page: 1,
                per_page: 100
            },
            SourceCall::Search {
                query: "mountains".into(),
                page: 2,
                per_page: 100
            },
        ]
    );
}

#[test]
fn search_failure_shows_error_without_retrying() {
    let source = Arc::new(ScriptedSource::new());
    source.on_any_search(Err(SourceError::Network("Something went wrong!".into())));
    let mut session = session_with(&source);

    session.submit_search("test");
    session.wait_idle(WAIT);
    std::thread::sleep(Duration::from_millis(50));
    session.pump();

    let view = session.view();
    assert!(view.has(TestId::ErrorMessage));
    assert_eq!(
        view.error.as_deref(),
        Some("Error fetching photos: Something went wrong!")
    );
    assert!(!view.has(TestId::LoadingSpinner));
    assert_eq!(source.call_count(), 1);
}

#[test]
fn slow_browse_page_does_not_overwrite_search_results() {
    let source = Arc::new(ScriptedSource::new());
    source.on_list(1, Ok(uniform_photos("browse", 50, 800, 1000)));
    source.set_list_latency(Duration::from_millis(300));
    source.on_search("cats", 1, Ok(uniform_photos("cat", 4, 800, 1000)));
    let mut session = session_with(&source);

    session.mount();
    session.submit_search("cats");
    assert!(session.wait_idle(WAIT));

    let ids: Vec<&str> = session.state().items.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["cat-0", "cat-1", "cat-2", "cat-3"]);
    assert_eq!(session.state().next_page, 2);
    assert!(!session.state().loading);
}

#[test]
fn empty_feed_shows_notice() {
    let source = Arc::new(ScriptedSource::new());
    let mut session = session_with(&source);
    session.mount();
    session.wait_idle(WAIT);

    let view = session.view();
    assert_eq!(view.empty_notice, Some("No photos"));
    assert_eq!(view.count(TestId::PhotoItem), 0);
    assert_eq!(session.state().status(), FeedStatus::Exhausted);
}
