//! mosaic: a virtualized masonry photo feed.
//!
//! The core is headless. `feed` and `detail` hold the state machines,
//! `layout` turns photos into positioned columns, and `view` renders state
//! into view models queried by test id. The optional `gui` feature adds a
//! GTK4 shell on top.

pub mod config;
pub mod detail;
pub mod feed;
pub mod layout;
pub mod models;
pub mod source;
pub mod view;

#[cfg(feature = "gui")]
pub mod app;
#[cfg(feature = "gui")]
pub mod ui;

pub use config::{Config, ConfigError};
pub use detail::{DetailSession, DetailState};
pub use feed::{FeedSession, SessionOptions};
pub use source::{PhotoSource, SourceError};
