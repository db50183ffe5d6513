use std::fmt;

/// Stable identifiers for presentation nodes.
///
/// Headless views are queried by these; the GTK shell uses them as widget
/// names so the same ids show up in the inspector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestId {
    GridContainer,
    SearchInputBar,
    SearchForm,
    SearchInput,
    SearchButton,
    LoadingSpinner,
    ErrorMessage,
    PhotoItem,
    BackButton,
    PhotoNotFoundError,
}

impl TestId {
    pub const ALL: [TestId; 10] = [
        TestId::GridContainer,
        TestId::SearchInputBar,
        TestId::SearchForm,
        TestId::SearchInput,
        TestId::SearchButton,
        TestId::LoadingSpinner,
        TestId::ErrorMessage,
        TestId::PhotoItem,
        TestId::BackButton,
        TestId::PhotoNotFoundError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TestId::GridContainer => "grid-container",
            TestId::SearchInputBar => "search-input-bar",
            TestId::SearchForm => "search-form",
            TestId::SearchInput => "search-input",
            TestId::SearchButton => "search-button",
            TestId::LoadingSpinner => "loading-spinner",
            TestId::ErrorMessage => "error-message",
            TestId::PhotoItem => "photo-item",
            TestId::BackButton => "back-button",
            TestId::PhotoNotFoundError => "photo-not-found-error",
        }
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
