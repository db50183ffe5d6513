pub mod layout_cache;
pub mod masonry;
pub mod virtualizer;

pub use layout_cache::{CachedLayoutComputer, LayoutCache};
pub use masonry::{LayoutGeometry, MasonryLayout};
pub use virtualizer::{Viewport, VisibleColumn, VisibleSet, VisibleWindow, Virtualizer};
