//! Headless view models.
//!
//! Pure functions of session state. The GTK shell renders them; tests
//! query them by [`TestId`].

pub mod detail;
pub mod grid;
pub mod route;
pub mod test_ids;

pub use detail::{DetailView, PhotoPage};
pub use grid::{ColumnView, GridView, PhotoTile, SearchBarView};
pub use route::Route;
pub use test_ids::TestId;
