use crate::models::{Column, ColumnAssignment, PhotoSummary, PlacedPhoto};

/// Container measurements turned into a column grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGeometry {
    pub column_count: u32,
    pub column_width_px: f64,
    pub container_height_px: f64,
}

/// Configuration for the masonry column layout.
///
/// Photos keep their aspect ratio at a shared column width; each new photo
/// goes to the currently shortest column.
#[derive(Debug, Clone)]
pub struct MasonryLayout {
    /// Target column width used to decide the column count (default: 300)
    pub base_column_width: f64,
    /// Upper bound on the column count (default: 4)
    pub max_columns: u32,
    /// Subtracted from each column's share of the container (default: 10)
    pub gutter: f64,
    /// Vertical gap after every photo in a column (default: 15)
    pub gap: f64,
}

impl Default for MasonryLayout {
    fn default() -> Self {
        Self {
            base_column_width: 300.0,
            max_columns: 4,
            gutter: 10.0,
            gap: 15.0,
        }
    }
}

fn sanitize_px(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

impl MasonryLayout {
    pub fn new(base_column_width: f64, max_columns: u32, gutter: f64, gap: f64) -> Self {
        Self {
            base_column_width,
            max_columns,
            gutter,
            gap,
        }
    }

    /// Column count and width for a container.
    ///
    /// `column_count = clamp(floor(width / base), 1, max_columns)` and
    /// `column_width = floor(width / column_count) - gutter`, never negative.
    pub fn compute_layout(&self, container_width_px: f64, container_height_px: f64) -> LayoutGeometry {
        let width = sanitize_px(container_width_px);
        let max_columns = self.max_columns.max(1);
        let fitting = if self.base_column_width > 0.0 {
            (width / self.base_column_width).floor()
        } else {
            max_columns as f64
        };
        let column_count = (fitting as u32).clamp(1, max_columns);
        let column_width_px = ((width / column_count as f64).floor() - self.gutter).max(0.0);

        LayoutGeometry {
            column_count,
            column_width_px,
            container_height_px: sanitize_px(container_height_px),
        }
    }

    /// Distribute photos over `column_count` columns.
    ///
    /// # Algorithm
    /// 1. Start every column at height 0.
    /// 2. Walk photos in arrival order; pick the column with the smallest
    ///    accumulated height (first one wins ties).
    /// 3. Place the photo at that height and grow the column by the photo's
    ///    scaled height plus the gap.
    pub fn assign_columns(
        &self,
        items: &[PhotoSummary],
        column_count: u32,
        column_width_px: f64,
    ) -> ColumnAssignment {
        if column_count == 0 {
            return ColumnAssignment::empty();
        }
        let column_width_px = sanitize_px(column_width_px);

        let mut columns: Vec<Column> = (0..column_count).map(Column::new).collect();

        for (photo_index, photo) in items.iter().enumerate() {
            let target = shortest_column(&columns);
            let column = &mut columns[target];
            let height_px = photo.scaled_height(column_width_px);
            column.items.push(PlacedPhoto {
                photo_index,
                top_px: column.height_px,
                height_px,
            });
            column.height_px += height_px + self.gap;
        }

        ColumnAssignment {
            column_width_px,
            columns,
        }
    }

    /// Convenience wrapper taking a computed geometry.
    pub fn assign(&self, items: &[PhotoSummary], geometry: &LayoutGeometry) -> ColumnAssignment {
        self.assign_columns(items, geometry.column_count, geometry.column_width_px)
    }
}

/// Index of the first column with the minimum accumulated height.
fn shortest_column(columns: &[Column]) -> usize {
    let mut best = 0;
    for (index, column) in columns.iter().enumerate().skip(1) {
        if column.height_px < columns[best].height_px {
            best = index;
        }
    }
    best
}
