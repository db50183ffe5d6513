use super::PhotoSummary;

/// Which feed the grid is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedMode {
    #[default]
    Browse,
    Search(String),
}

impl FeedMode {
    /// Map a submitted query to a mode. Blank queries browse.
    pub fn from_query(query: &str) -> Self {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            Self::Browse
        } else {
            Self::Search(trimmed.to_string())
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Browse => None,
            Self::Search(q) => Some(q),
        }
    }
}

/// Coarse status of the feed, derived from [`FeedState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    Idle,
    Loading,
    Loaded,
    Exhausted,
    Error,
}

/// Accumulated feed for the current mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    pub mode: FeedMode,
    /// Arrival order; append-only within a mode.
    pub items: Vec<PhotoSummary>,
    /// Page to request next.
    pub next_page: u32,
    pub exhausted: bool,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            mode: FeedMode::Browse,
            items: Vec::new(),
            next_page: 1,
            exhausted: false,
            loading: false,
            last_error: None,
        }
    }
}

impl FeedState {
    pub fn status(&self) -> FeedStatus {
        if self.loading {
            FeedStatus::Loading
        } else if self.last_error.is_some() {
            FeedStatus::Error
        } else if self.exhausted {
            FeedStatus::Exhausted
        } else if self.items.is_empty() {
            FeedStatus::Idle
        } else {
            FeedStatus::Loaded
        }
    }

    /// True when another page may be requested right now.
    pub fn can_fetch_more(&self) -> bool {
        !self.loading && !self.exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_query_trims() {
        assert_eq!(FeedMode::from_query("  "), FeedMode::Browse);
        assert_eq!(
            FeedMode::from_query(" cats "),
            FeedMode::Search("cats".to_string())
        );
    }

    #[test]
    fn test_status_precedence() {
        let mut state = FeedState::default();
        assert_eq!(state.status(), FeedStatus::Idle);

        state.loading = true;
        state.last_error = Some("boom".into());
        assert_eq!(state.status(), FeedStatus::Loading);

        state.loading = false;
        assert_eq!(state.status(), FeedStatus::Error);

        state.last_error = None;
        state.exhausted = true;
        assert_eq!(state.status(), FeedStatus::Exhausted);
        assert!(!state.can_fetch_more());
    }
}
