/// A photo placed in a column.
///
/// `photo_index` points into the feed's accumulated item list; the
/// assignment is a projection over that list and never owns photos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPhoto {
    pub photo_index: usize,
    pub top_px: f64,
    pub height_px: f64,
}

impl PlacedPhoto {
    pub fn bottom_px(&self) -> f64 {
        self.top_px + self.height_px
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub column_index: u32,
    /// Accumulated height including the trailing gap of every item.
    pub height_px: f64,
    pub items: Vec<PlacedPhoto>,
}

impl Column {
    pub fn new(column_index: u32) -> Self {
        Self {
            column_index,
            height_px: 0.0,
            items: Vec::new(),
        }
    }
}

/// Output of the masonry balancer for one (items, column count, width) triple.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAssignment {
    pub column_width_px: f64,
    pub columns: Vec<Column>,
}

impl ColumnAssignment {
    pub fn empty() -> Self {
        Self {
            column_width_px: 0.0,
            columns: Vec::new(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum()
    }

    /// Height of the tallest column, i.e. the scrollable content height.
    pub fn content_height(&self) -> f64 {
        self.columns
            .iter()
            .map(|c| c.height_px)
            .fold(0.0, f64::max)
    }
}
