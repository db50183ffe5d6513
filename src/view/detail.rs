use chrono::DateTime;

use crate::detail::DetailState;
use crate::models::PhotoDetail;

use super::{Route, TestId};

pub const NOT_FOUND_TEXT: &str = "Photo not found";
pub const BACK_LABEL: &str = "Back to Grid";

/// Loaded detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPage {
    pub back_href: String,
    pub back_label: &'static str,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub alt: String,
    pub photographer_line: String,
    pub date_line: String,
    pub description_line: String,
}

impl PhotoPage {
    pub fn from_detail(detail: &PhotoDetail) -> Self {
        Self {
            back_href: Route::Grid.href(),
            back_label: BACK_LABEL,
            title: detail.summary.alt_text.clone(),
            image_url: detail.summary.regular_url.clone(),
            alt: detail.summary.alt_or_default().to_string(),
            photographer_line: format!("Photographer's name: {}", detail.photographer),
            date_line: format!("Date Taken: {}", format_date_taken(&detail.created_at)),
            description_line: format!(
                "Description: {}",
                detail.description.as_deref().unwrap_or_default()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Loading,
    Error { message: String },
    NotFound { message: &'static str },
    Loaded(PhotoPage),
}

impl DetailView {
    pub fn from_state(state: &DetailState) -> Self {
        match state {
            DetailState::Loading => Self::Loading,
            DetailState::Error(message) => Self::Error {
                message: message.clone(),
            },
            DetailState::NotFound => Self::NotFound {
                message: NOT_FOUND_TEXT,
            },
            DetailState::Loaded(detail) => Self::Loaded(PhotoPage::from_detail(detail)),
        }
    }

    pub fn count(&self, id: TestId) -> usize {
        let present = matches!(
            (self, id),
            (Self::Loading, TestId::LoadingSpinner)
                | (Self::Error { .. }, TestId::ErrorMessage)
                | (Self::NotFound { .. }, TestId::PhotoNotFoundError)
                | (Self::Loaded(_), TestId::BackButton)
        );
        usize::from(present)
    }

    pub fn has(&self, id: TestId) -> bool {
        self.count(id) > 0
    }
}

/// Calendar date as month/day/year, in the offset the timestamp was
/// written in. Unparseable input is shown as-is.
pub fn format_date_taken(created_at: &str) -> String {
    match DateTime::parse_from_rfc3339(created_at) {
        Ok(timestamp) => timestamp.format("%-m/%-d/%Y").to_string(),
        Err(_) => created_at.to_string(),
    }
}
