//! Viewport virtualization for masonry columns.
//!
//! Only items intersecting a buffered window around the viewport are
//! materialized. Columns keep their full accumulated height so the scroll
//! extent does not change as items mount and unmount.

use std::ops::Range;

use tracing::trace;

use crate::models::ColumnAssignment;

/// Scroll position and viewport size of the grid container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_top_px: f64,
    pub height_px: f64,
}

/// Vertical span that must be materialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleWindow {
    pub top_px: f64,
    pub bottom_px: f64,
}

impl VisibleWindow {
    /// True if `[top, top + height]` overlaps the window.
    pub fn intersects(&self, top_px: f64, height_px: f64) -> bool {
        top_px + height_px > self.top_px && top_px < self.bottom_px
    }
}

/// Materialized slice of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleColumn {
    pub column_index: u32,
    /// Full column height, independent of how many items are mounted.
    pub height_px: f64,
    /// Indices into the column's placed items.
    pub range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisibleSet {
    pub columns: Vec<VisibleColumn>,
}

impl VisibleSet {
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(|c| c.range.len()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct Virtualizer {
    /// Viewport heights rendered above and below the viewport (default: 5)
    pub buffer_multiplier: f64,
}

impl Default for Virtualizer {
    fn default() -> Self {
        Self {
            buffer_multiplier: 5.0,
        }
    }
}

impl Virtualizer {
    pub fn new(buffer_multiplier: f64) -> Self {
        Self {
            buffer_multiplier: buffer_multiplier.max(0.0),
        }
    }

    /// `[scroll_top - B*h, scroll_top + (1+B)*h]`
    pub fn window(&self, viewport: &Viewport) -> VisibleWindow {
        let h = viewport.height_px.max(0.0);
        VisibleWindow {
            top_px: viewport.scroll_top_px - self.buffer_multiplier * h,
            bottom_px: viewport.scroll_top_px + (1.0 + self.buffer_multiplier) * h,
        }
    }

    /// Visible range of every column.
    ///
    /// Tops and bottoms increase monotonically inside a column, so each range
    /// is found with two binary searches; cost is logarithmic in column length.
    pub fn visible(&self, assignment: &ColumnAssignment, viewport: &Viewport) -> VisibleSet {
        let window = self.window(viewport);

        let columns: Vec<VisibleColumn> = assignment
            .columns
            .iter()
            .map(|column| {
                let items = &column.items;
                let start = items.partition_point(|p| p.bottom_px() <= window.top_px);
                let end = items.partition_point(|p| p.top_px < window.bottom_px);
                VisibleColumn {
                    column_index: column.column_index,
                    height_px: column.height_px,
                    range: start..end.max(start),
                }
            })
            .collect();

        let set = VisibleSet { columns };
        trace!(
            scroll_top = viewport.scroll_top_px,
            visible = set.item_count(),
            total = assignment.item_count(),
            "virtualized"
        );
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MasonryLayout;
    use crate::models::PhotoSummary;

    fn square_items(count: usize) -> Vec<PhotoSummary> {
        (0..count)
            .map(|i| PhotoSummary::new(format!("{i}"), 100, 100))
            .collect()
    }

    /// Brute-force check of the intersection rule for every placed item.
    fn assert_matches_linear_scan(
        virtualizer: &Virtualizer,
        assignment: &ColumnAssignment,
        viewport: &Viewport,
    ) {
        let window = virtualizer.window(viewport);
        let set = virtualizer.visible(assignment, viewport);
        for (column, visible) in assignment.columns.iter().zip(&set.columns) {
            for (i, placed) in column.items.iter().enumerate() {
                assert_eq!(
                    visible.range.contains(&i),
                    window.intersects(placed.top_px, placed.height_px),
                    "item {} top {} in window {:?}",
                    i,
                    placed.top_px,
                    window
                );
            }
        }
    }

    #[test]
    fn test_window_bounds() {
        let v = Virtualizer::new(2.0);
        let w = v.window(&Viewport {
            scroll_top_px: 1000.0,
            height_px: 100.0,
        });
        assert_eq!(w.top_px, 800.0);
        assert_eq!(w.bottom_px, 1300.0);
    }

    #[test]
    fn test_intersection_is_strict() {
        let w = VisibleWindow {
            top_px: 100.0,
            bottom_px: 200.0,
        };
        assert!(!w.intersects(0.0, 100.0));
        assert!(w.intersects(0.0, 100.5));
        assert!(w.intersects(199.0, 10.0));
        assert!(!w.intersects(200.0, 10.0));
    }

    #[test]
    fn test_visible_range_single_column() {
        let layout = MasonryLayout::new(300.0, 4, 10.0, 0.0);
        let assignment = layout.assign_columns(&square_items(100), 1, 100.0);
        let v = Virtualizer::new(1.0);

        // window = [250, 1000)
        let set = v.visible(
            &assignment,
            &Viewport {
                scroll_top_px: 500.0,
                height_px: 250.0,
            },
        );
        assert_eq!(set.columns[0].range, 2..10);
        assert_eq!(set.columns[0].height_px, 10_000.0);
    }

    #[test]
    fn test_column_height_preserved_when_nothing_visible() {
        let layout = MasonryLayout::default();
        let assignment = layout.assign_columns(&square_items(10), 2, 200.0);
        let v = Virtualizer::default();
        let set = v.visible(
            &assignment,
            &Viewport {
                scroll_top_px: 1_000_000.0,
                height_px: 500.0,
            },
        );
        assert_eq!(set.item_count(), 0);
        for (column, visible) in assignment.columns.iter().zip(&set.columns) {
            assert_eq!(visible.height_px, column.height_px);
            assert!(visible.height_px > 0.0);
        }
    }

    #[test]
    fn test_matches_linear_scan() {
        let layout = MasonryLayout::default();
        let items: Vec<PhotoSummary> = (0..300u32)
            .map(|i| PhotoSummary::new(format!("{i}"), 200 + (i * 71) % 800, 150 + (i * 43) % 900))
            .collect();
        let assignment = layout.assign_columns(&items, 4, 290.0);

        for buffer in [0.0, 0.5, 5.0] {
            let v = Virtualizer::new(buffer);
            for scroll_top in [0.0, 123.0, 2_500.0, 10_000.0, 40_000.0] {
                assert_matches_linear_scan(
                    &v,
                    &assignment,
                    &Viewport {
                        scroll_top_px: scroll_top,
                        height_px: 700.0,
                    },
                );
            }
        }
    }

    #[test]
    fn test_zero_height_viewport() {
        let layout = MasonryLayout::default();
        let assignment = layout.assign_columns(&square_items(5), 1, 100.0);
        let set = Virtualizer::default().visible(&assignment, &Viewport::default());
        // Empty window at scroll 0: nothing has top < 0.
        assert_eq!(set.item_count(), 0);
    }
}
