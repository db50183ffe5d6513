pub mod column_model;
pub mod feed_state;
pub mod photo;

pub use column_model::*;
pub use feed_state::*;
pub use photo::*;
