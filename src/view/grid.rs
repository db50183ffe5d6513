use crate::layout::VisibleSet;
use crate::models::{ColumnAssignment, FeedState};

use super::{Route, TestId};

pub const SEARCH_PLACEHOLDER: &str = "Search for photos...";
pub const SEARCH_ARIA_LABEL: &str = "Search input";
pub const SEARCH_BUTTON_LABEL: &str = "Search";
pub const EMPTY_NOTICE: &str = "No photos";

/// Controlled search input: `text` mirrors what the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarView {
    pub text: String,
    pub placeholder: &'static str,
    pub aria_label: &'static str,
    pub button_label: &'static str,
}

impl SearchBarView {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            placeholder: SEARCH_PLACEHOLDER,
            aria_label: SEARCH_ARIA_LABEL,
            button_label: SEARCH_BUTTON_LABEL,
        }
    }
}

/// A mounted photo, absolutely positioned inside its column.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoTile {
    /// Position in the feed's item list. Ids can repeat across pages, so
    /// this is what identifies a tile.
    pub photo_index: usize,
    pub id: String,
    pub href: String,
    pub thumbnail_url: Option<String>,
    pub alt: String,
    pub top_px: f64,
    pub height_px: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub column_index: u32,
    pub width_px: f64,
    /// Full accumulated height; keeps the scroll extent stable.
    pub height_px: f64,
    pub tiles: Vec<PhotoTile>,
}

/// Everything the grid screen shows for one state snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub search_bar: SearchBarView,
    pub error: Option<String>,
    pub loading: bool,
    pub empty_notice: Option<&'static str>,
    pub columns: Vec<ColumnView>,
}

impl GridView {
    pub fn build(
        state: &FeedState,
        search_text: &str,
        assignment: &ColumnAssignment,
        visible: &VisibleSet,
    ) -> Self {
        let columns = assignment
            .columns
            .iter()
            .zip(&visible.columns)
            .map(|(column, shown)| {
                let tiles = column.items[shown.range.clone()]
                    .iter()
                    .filter_map(|placed| {
                        let photo = state.items.get(placed.photo_index)?;
                        Some(PhotoTile {
                            photo_index: placed.photo_index,
                            id: photo.id.clone(),
                            href: Route::Photo(photo.id.clone()).href(),
                            thumbnail_url: photo.thumbnail_url.clone(),
                            alt: photo.alt_or_default().to_string(),
                            top_px: placed.top_px,
                            height_px: placed.height_px,
                        })
                    })
                    .collect();
                ColumnView {
                    column_index: column.column_index,
                    width_px: assignment.column_width_px,
                    height_px: column.height_px,
                    tiles,
                }
            })
            .collect();

        Self {
            search_bar: SearchBarView::new(search_text),
            error: state.last_error.clone(),
            loading: state.loading,
            empty_notice: (!state.loading && state.items.is_empty()).then_some(EMPTY_NOTICE),
            columns,
        }
    }

    /// Number of nodes carrying `id`.
    pub fn count(&self, id: TestId) -> usize {
        match id {
            TestId::GridContainer
            | TestId::SearchInputBar
            | TestId::SearchForm
            | TestId::SearchInput
            | TestId::SearchButton => 1,
            TestId::LoadingSpinner => usize::from(self.loading),
            TestId::ErrorMessage => usize::from(self.error.is_some()),
            TestId::PhotoItem => self.columns.iter().map(|c| c.tiles.len()).sum(),
            TestId::BackButton | TestId::PhotoNotFoundError => 0,
        }
    }

    pub fn has(&self, id: TestId) -> bool {
        self.count(id) > 0
    }

    pub fn photo_items(&self) -> impl Iterator<Item = &PhotoTile> {
        self.columns.iter().flat_map(|c| c.tiles.iter())
    }

    /// Tallest column; the scrollable content height.
    pub fn content_height(&self) -> f64 {
        self.columns.iter().map(|c| c.height_px).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{MasonryLayout, Viewport, Virtualizer};
    use crate::source::scripted::uniform_photos;

    fn view_of(state: &FeedState, viewport: Viewport) -> GridView {
        let layout = MasonryLayout::default();
        let geometry = layout.compute_layout(1200.0, viewport.height_px);
        let assignment = layout.assign(&state.items, &geometry);
        let visible = Virtualizer::default().visible(&assignment, &viewport);
        GridView::build(state, "", &assignment, &visible)
    }

    #[test]
    fn test_loading_view() {
        let state = FeedState {
            loading: true,
            ..FeedState::default()
        };
        let view = view_of(&state, Viewport::default());
        assert!(view.has(TestId::LoadingSpinner));
        assert!(view.has(TestId::GridContainer));
        assert!(!view.has(TestId::ErrorMessage));
        assert_eq!(view.empty_notice, None);
        assert_eq!(view.count(TestId::PhotoItem), 0);
    }

    #[test]
    fn test_empty_notice_when_idle_and_empty() {
        let view = view_of(&FeedState::default(), Viewport::default());
        assert_eq!(view.empty_notice, Some("No photos"));
        assert!(!view.has(TestId::LoadingSpinner));
    }

    #[test]
    fn test_error_and_items_render_together() {
        let state = FeedState {
            items: uniform_photos("p", 8, 400, 300),
            last_error: Some("Error fetching photos: boom".into()),
            ..FeedState::default()
        };
        let view = view_of(
            &state,
            Viewport {
                scroll_top_px: 0.0,
                height_px: 800.0,
            },
        );
        assert!(view.has(TestId::ErrorMessage));
        assert_eq!(view.error.as_deref(), Some("Error fetching photos: boom"));
        assert_eq!(view.count(TestId::PhotoItem), 8);
    }

    #[test]
    fn test_tiles_link_to_detail() {
        let state = FeedState {
            items: uniform_photos("p", 3, 400, 300),
            ..FeedState::default()
        };
        let view = view_of(
            &state,
            Viewport {
                scroll_top_px: 0.0,
                height_px: 800.0,
            },
        );
        let tile = view.photo_items().find(|t| t.id == "p-1").unwrap();
        assert_eq!(tile.href, "/photo/p-1");
        assert_eq!(tile.alt, "p photo 1");
        assert_eq!(
            tile.thumbnail_url.as_deref(),
            Some("https://images.example/p-1/thumb")
        );
    }

    #[test]
    fn test_repeated_ids_keep_separate_tiles() {
        let mut items = uniform_photos("p", 4, 400, 300);
        // The same photo delivered again on a later page.
        items.push(items[0].clone());
        let state = FeedState {
            items,
            ..FeedState::default()
        };
        let view = view_of(
            &state,
            Viewport {
                scroll_top_px: 0.0,
                height_px: 800.0,
            },
        );

        assert_eq!(view.count(TestId::PhotoItem), 5);
        let mut copies: Vec<&PhotoTile> = view.photo_items().filter(|t| t.id == "p-0").collect();
        copies.sort_by_key(|t| t.photo_index);
        assert_eq!(copies.len(), 2);
        assert_eq!(copies[0].photo_index, 0);
        assert_eq!(copies[1].photo_index, 4);
        assert!(copies[1].top_px > copies[0].top_px);

        let mut indexes: Vec<usize> = view.photo_items().map(|t| t.photo_index).collect();
        indexes.sort_unstable();
        assert_eq!(indexes, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_search_bar_labels() {
        let bar = SearchBarView::new("dogs");
        assert_eq!(bar.text, "dogs");
        assert_eq!(bar.placeholder, "Search for photos...");
        assert_eq!(bar.aria_label, "Search input");
        assert_eq!(bar.button_label, "Search");
    }
}
