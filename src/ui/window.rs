// Main window for mosaic
// Stack with the masonry grid and the photo detail page

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    gdk, glib, Application, ApplicationWindow, CssProvider, EventControllerKey, Settings, Stack,
    StackTransitionType, STYLE_PROVIDER_PRIORITY_APPLICATION,
};

use super::detail_page::DetailPage;
use super::masonry_view::MasonryView;
use crate::config::Config;
use crate::detail::DetailSession;
use crate::feed::{FeedSession, ScrollMetrics, SessionOptions};
use crate::source::PhotoSource;
use crate::view::Route;

const PUMP_INTERVAL: Duration = Duration::from_millis(16);

const CSS: &str = r#"
window {
    background-color: #101010;
    color: #e0e0e0;
}

.search-bar entry {
    min-height: 32px;
}

.photo-item {
    background-color: #1c1c1c;
}

.photo-item:hover {
    opacity: 0.85;
}

.error {
    color: #ff6b6b;
    margin: 8px;
}
"#;

fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_string(CSS);
    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

pub struct MainWindow {
    self_weak: RefCell<Weak<MainWindow>>,
    window: ApplicationWindow,
    stack: Stack,
    grid: MasonryView,
    detail_page: DetailPage,
    feed: RefCell<FeedSession>,
    detail: RefCell<DetailSession>,
    route: RefCell<Route>,
    last_size: Cell<(i32, i32)>,
}

impl MainWindow {
    pub fn new(
        app: &Application,
        config: &Config,
        source: Arc<dyn PhotoSource>,
    ) -> Result<Rc<Self>> {
        load_css();
        if let Some(settings) = Settings::default() {
            settings.set_gtk_application_prefer_dark_theme(true);
        }

        let window = ApplicationWindow::builder()
            .application(app)
            .title("mosaic")
            .default_width(1280)
            .default_height(860)
            .build();

        let stack = Stack::new();
        stack.set_transition_type(StackTransitionType::Crossfade);
        stack.set_transition_duration(150);

        let grid = MasonryView::new();
        let detail_page = DetailPage::new();
        stack.add_named(grid.widget(), Some("grid"));
        stack.add_named(detail_page.widget(), Some("detail"));
        stack.set_visible_child_name("grid");
        window.set_child(Some(&stack));

        let feed = FeedSession::new(Arc::clone(&source), SessionOptions::from(config))?;
        let detail = DetailSession::new(source)?;

        let main_window = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            window,
            stack,
            grid,
            detail_page,
            feed: RefCell::new(feed),
            detail: RefCell::new(detail),
            route: RefCell::new(Route::Grid),
            last_size: Cell::new((0, 0)),
        });
        *main_window.self_weak.borrow_mut() = Rc::downgrade(&main_window);

        main_window.setup_search();
        main_window.setup_scroll();
        main_window.setup_navigation();
        main_window.setup_resize_observer();
        main_window.setup_pump();

        main_window.feed.borrow_mut().mount();
        main_window.render_grid();

        Ok(main_window)
    }

    pub fn present(&self) {
        self.window.present();
    }

    fn weak(&self) -> Weak<MainWindow> {
        self.self_weak.borrow().clone()
    }

    fn setup_search(&self) {
        let weak = self.weak();
        self.grid.connect_search_changed(move |text| {
            if let Some(window) = weak.upgrade() {
                window.feed.borrow_mut().set_search_text(&text);
            }
        });

        let weak = self.weak();
        self.grid.connect_search_submitted(move || {
            if let Some(window) = weak.upgrade() {
                window.feed.borrow_mut().submit_current_search();
                window.grid.scrolled_window().vadjustment().set_value(0.0);
                window.render_grid();
            }
        });
    }

    fn setup_scroll(&self) {
        let weak = self.weak();
        self.grid.connect_scrolled(move |metrics: ScrollMetrics| {
            if let Some(window) = weak.upgrade() {
                window.feed.borrow_mut().scroll_with_metrics(metrics);
                window.render_grid();
            }
        });
    }

    fn setup_navigation(&self) {
        let weak = self.weak();
        self.grid.connect_photo_activated(move |id| {
            if let Some(window) = weak.upgrade() {
                window.navigate(Route::Photo(id));
            }
        });

        let weak = self.weak();
        self.detail_page.connect_back(move || {
            if let Some(window) = weak.upgrade() {
                window.navigate(Route::Grid);
            }
        });

        let keys = EventControllerKey::new();
        let weak = self.weak();
        keys.connect_key_pressed(move |_, key, _, _| {
            let Some(window) = weak.upgrade() else {
                return glib::Propagation::Proceed;
            };
            let on_detail = matches!(*window.route.borrow(), Route::Photo(_));
            if on_detail && matches!(key, gdk::Key::Escape | gdk::Key::BackSpace) {
                window.navigate(Route::Grid);
                return glib::Propagation::Stop;
            }
            glib::Propagation::Proceed
        });
        self.window.add_controller(keys);
    }

    fn setup_resize_observer(&self) {
        let weak = self.weak();
        let scrolled = self.grid.scrolled_window().clone();
        scrolled.add_tick_callback(move |_widget, _clock| {
            let Some(window) = weak.upgrade() else {
                return glib::ControlFlow::Break;
            };
            let (width, height) = window.grid.viewport_size();
            let size = (width.round() as i32, height.round() as i32);
            if size.0 > 0 && size != window.last_size.get() {
                window.last_size.set(size);
                tracing::debug!(width, height, "Grid viewport resized");
                window.feed.borrow_mut().resize(width, height);
                window.render_grid();
            }
            glib::ControlFlow::Continue
        });
    }

    fn setup_pump(&self) {
        let weak = self.weak();
        glib::timeout_add_local(PUMP_INTERVAL, move || {
            let Some(window) = weak.upgrade() else {
                return glib::ControlFlow::Break;
            };
            let feed_changed = window.feed.borrow_mut().pump() > 0;
            if feed_changed {
                window.render_grid();
            }
            let detail_changed = window.detail.borrow_mut().pump();
            if detail_changed {
                window.render_detail();
            }
            glib::ControlFlow::Continue
        });
    }

    pub fn navigate(&self, route: Route) {
        tracing::info!(route = %route, "Navigate");
        match &route {
            Route::Grid => {
                self.stack.set_visible_child_name("grid");
            }
            Route::Photo(id) => {
                self.detail.borrow_mut().open(id);
                self.render_detail();
                self.stack.set_visible_child_name("detail");
            }
        }
        self.window.set_title(Some(&format!("mosaic {}", route.href())));
        *self.route.borrow_mut() = route;
    }

    fn render_grid(&self) {
        // Borrow released before rendering: widget updates can re-enter via signals.
        let view = self.feed.borrow().view();
        self.grid.render(&view);
    }

    fn render_detail(&self) {
        let view = self.detail.borrow().view();
        self.detail_page.render(&view);
    }
}
