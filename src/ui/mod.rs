mod detail_page;
mod masonry_view;
mod thumbnail_loader;
mod window;

pub use window::MainWindow;
