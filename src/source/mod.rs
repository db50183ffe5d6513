//! Photo provider boundary.
//!
//! This module provides:
//! - `PhotoSource` - the three remote operations the feed depends on
//! - `SourceError` - the uniform failure type callers translate to messages
//! - `UnsplashSource` - HTTP implementation over the Unsplash REST API
//! - `ScriptedSource` - in-memory source that records calls

use thiserror::Error;

use crate::models::{PhotoDetail, PhotoSummary};

pub mod scripted;
pub mod unsplash;

pub use scripted::{ScriptedSource, SourceCall};
pub use unsplash::UnsplashSource;

/// Failure of a provider call.
///
/// Callers treat every variant the same way; the split only exists for
/// logging.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Transport failure or a non-success status without a provider message.
    #[error("{0}")]
    Network(String),
    /// Body could not be decoded into the expected shape.
    #[error("{0}")]
    Malformed(String),
    /// Provider answered with an `errors` array.
    #[error("{0}")]
    Provider(String),
}

impl SourceError {
    pub fn message(&self) -> &str {
        match self {
            Self::Network(m) | Self::Malformed(m) | Self::Provider(m) => m,
        }
    }
}

/// Paginated photo provider.
///
/// Calls block; the fetch queue runs them off the UI thread. An empty page
/// is the "no more pages" signal, not an error.
pub trait PhotoSource: Send + Sync {
    fn list_page(&self, page: u32, per_page: u32) -> Result<Vec<PhotoSummary>, SourceError>;

    fn search_page(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PhotoSummary>, SourceError>;

    /// `Ok(None)` when the provider has no photo with this id.
    fn fetch_detail(&self, id: &str) -> Result<Option<PhotoDetail>, SourceError>;
}
