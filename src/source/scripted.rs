//! In-memory photo source with scripted responses.
//!
//! Every call is recorded so tests (and the offline demo shell) can assert
//! exactly which pages were requested. Unscripted pages answer with an empty
//! page; unscripted detail ids answer with "not found".

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use super::{PhotoSource, SourceError};
use crate::models::{PhotoDetail, PhotoSummary};

/// A recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    List { page: u32, per_page: u32 },
    Search { query: String, page: u32, per_page: u32 },
    Detail { id: String },
}

type PageResult = Result<Vec<PhotoSummary>, SourceError>;
type DetailResult = Result<Option<PhotoDetail>, SourceError>;

#[derive(Default)]
struct Script {
    list: HashMap<u32, PageResult>,
    list_fallback: Option<PageResult>,
    search: HashMap<(String, u32), PageResult>,
    search_fallback: Option<PageResult>,
    detail: HashMap<String, DetailResult>,
    list_latency: Duration,
    search_latency: Duration,
}

#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<Script>,
    calls: Mutex<Vec<SourceCall>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `list_page(page, _)`.
    pub fn on_list(&self, page: u32, result: PageResult) -> &Self {
        self.script.lock().list.insert(page, result);
        self
    }

    /// Respond to every `list_page` call without a page-specific script.
    pub fn on_any_list(&self, result: PageResult) -> &Self {
        self.script.lock().list_fallback = Some(result);
        self
    }

    pub fn on_search(&self, query: &str, page: u32, result: PageResult) -> &Self {
        self.script
            .lock()
            .search
            .insert((query.to_string(), page), result);
        self
    }

    /// Respond to every `search_page` call without a specific script.
    pub fn on_any_search(&self, result: PageResult) -> &Self {
        self.script.lock().search_fallback = Some(result);
        self
    }

    pub fn on_detail(&self, id: &str, result: DetailResult) -> &Self {
        self.script.lock().detail.insert(id.to_string(), result);
        self
    }

    /// Delay every `list_page` answer, to simulate a slow browse feed.
    pub fn set_list_latency(&self, latency: Duration) -> &Self {
        self.script.lock().list_latency = latency;
        self
    }

    pub fn set_search_latency(&self, latency: Duration) -> &Self {
        self.script.lock().search_latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: SourceCall) {
        self.calls.lock().push(call);
    }
}

impl PhotoSource for ScriptedSource {
    fn list_page(&self, page: u32, per_page: u32) -> Result<Vec<PhotoSummary>, SourceError> {
        self.record(SourceCall::List { page, per_page });
        let (result, latency) = {
            let script = self.script.lock();
            let result = script
                .list
                .get(&page)
                .or(script.list_fallback.as_ref())
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()));
            (result, script.list_latency)
        };
        if !latency.is_zero() {
            thread::sleep(latency);
        }
        result
    }

    fn search_page(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PhotoSummary>, SourceError> {
        self.record(SourceCall::Search {
            query: query.to_string(),
            page,
            per_page,
        });
        let (result, latency) = {
            let script = self.script.lock();
            let result = script
                .search
                .get(&(query.to_string(), page))
                .or(script.search_fallback.as_ref())
                .cloned()
                .unwrap_or_else(|| Ok(Vec::new()));
            (result, script.search_latency)
        };
        if !latency.is_zero() {
            thread::sleep(latency);
        }
        result
    }

    fn fetch_detail(&self, id: &str) -> Result<Option<PhotoDetail>, SourceError> {
        self.record(SourceCall::Detail { id: id.to_string() });
        self.script
            .lock()
            .detail
            .get(id)
            .cloned()
            .unwrap_or(Ok(None))
    }
}

/// `count` photos with ids `{prefix}-{n}` and the given dimensions.
pub fn uniform_photos(prefix: &str, count: usize, width: u32, height: u32) -> Vec<PhotoSummary> {
    (0..count)
        .map(|n| {
            PhotoSummary::new(format!("{prefix}-{n}"), width, height)
                .with_thumbnail(format!("https://images.example/{prefix}-{n}/thumb"))
                .with_alt_text(format!("{prefix} photo {n}"))
        })
        .collect()
}
