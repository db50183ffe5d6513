// Masonry grid widget
// One gtk::Fixed per column sized to the full column height; only the
// tiles in the virtualized window are mounted as children.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, ContentFit, Entry, Fixed, GestureClick, Label, Orientation,
    Picture, PolicyType, ScrolledWindow, Spinner,
};

use super::thumbnail_loader::{load_into, THUMBNAIL_EDGE};
use crate::feed::ScrollMetrics;
use crate::view::{GridView, PhotoTile, SearchBarView, TestId};

const COLUMN_SPACING: i32 = 10;

type OpenCallback = Rc<RefCell<Option<Box<dyn Fn(String)>>>>;

struct MountedTile {
    id: String,
    column: usize,
    picture: Picture,
    top_px: f64,
    height_px: f64,
}

pub struct MasonryView {
    root: GtkBox,
    search_entry: Entry,
    search_button: Button,
    spinner: Spinner,
    error_label: Label,
    empty_label: Label,
    scrolled: ScrolledWindow,
    columns_box: GtkBox,
    columns: RefCell<Vec<Fixed>>,
    /// Keyed by `PhotoTile::photo_index`.
    mounted: RefCell<HashMap<usize, MountedTile>>,
    on_open: OpenCallback,
}

impl MasonryView {
    pub fn new() -> Self {
        let root = GtkBox::new(Orientation::Vertical, 0);
        root.set_widget_name(TestId::GridContainer.as_str());

        let search_bar = GtkBox::new(Orientation::Horizontal, 0);
        search_bar.set_widget_name(TestId::SearchInputBar.as_str());
        search_bar.add_css_class("search-bar");
        search_bar.set_halign(Align::Center);
        search_bar.set_margin_top(12);
        search_bar.set_margin_bottom(12);

        let search_form = GtkBox::new(Orientation::Horizontal, 6);
        search_form.set_widget_name(TestId::SearchForm.as_str());

        let labels = SearchBarView::new("");

        let search_entry = Entry::new();
        search_entry.set_widget_name(TestId::SearchInput.as_str());
        search_entry.set_placeholder_text(Some(labels.placeholder));
        search_entry.update_property(&[gtk4::accessible::Property::Label(labels.aria_label)]);
        search_entry.set_width_chars(40);

        let search_button = Button::with_label(labels.button_label);
        search_button.set_widget_name(TestId::SearchButton.as_str());

        search_form.append(&search_entry);
        search_form.append(&search_button);
        search_bar.append(&search_form);

        let error_label = Label::new(None);
        error_label.set_widget_name(TestId::ErrorMessage.as_str());
        error_label.add_css_class("error");
        error_label.set_visible(false);

        let spinner = Spinner::new();
        spinner.set_widget_name(TestId::LoadingSpinner.as_str());
        spinner.set_visible(false);

        let empty_label = Label::new(None);
        empty_label.add_css_class("error");
        empty_label.set_visible(false);

        let columns_box = GtkBox::new(Orientation::Horizontal, COLUMN_SPACING);
        columns_box.set_halign(Align::Center);
        columns_box.set_valign(Align::Start);

        let scrolled = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Never)
            .vscrollbar_policy(PolicyType::Automatic)
            .child(&columns_box)
            .vexpand(true)
            .hexpand(true)
            .build();

        root.append(&search_bar);
        root.append(&error_label);
        root.append(&spinner);
        root.append(&empty_label);
        root.append(&scrolled);

        Self {
            root,
            search_entry,
            search_button,
            spinner,
            error_label,
            empty_label,
            scrolled,
            columns_box,
            columns: RefCell::new(Vec::new()),
            mounted: RefCell::new(HashMap::new()),
            on_open: Rc::new(RefCell::new(None)),
        }
    }

    pub fn widget(&self) -> &GtkBox {
        &self.root
    }

    pub fn scrolled_window(&self) -> &ScrolledWindow {
        &self.scrolled
    }

    /// Visible size of the scroll area.
    pub fn viewport_size(&self) -> (f64, f64) {
        (self.scrolled.width() as f64, self.scrolled.height() as f64)
    }

    pub fn connect_search_changed<F: Fn(String) + 'static>(&self, callback: F) {
        self.search_entry
            .connect_changed(move |entry| callback(entry.text().to_string()));
    }

    pub fn connect_search_submitted<F: Fn() + 'static>(&self, callback: F) {
        let callback = Rc::new(callback);
        let on_activate = callback.clone();
        self.search_entry.connect_activate(move |_| on_activate());
        self.search_button.connect_clicked(move |_| callback());
    }

    pub fn connect_scrolled<F: Fn(ScrollMetrics) + 'static>(&self, callback: F) {
        self.scrolled
            .vadjustment()
            .connect_value_changed(move |adj| {
                callback(ScrollMetrics {
                    scroll_top_px: adj.value(),
                    scroll_height_px: adj.upper(),
                    client_height_px: adj.page_size(),
                });
            });
    }

    /// Called with the photo id when a tile is clicked.
    pub fn connect_photo_activated<F: Fn(String) + 'static>(&self, callback: F) {
        *self.on_open.borrow_mut() = Some(Box::new(callback));
    }

    pub fn render(&self, view: &GridView) {
        if self.search_entry.text().as_str() != view.search_bar.text {
            self.search_entry.set_text(&view.search_bar.text);
        }

        self.spinner.set_visible(view.loading);
        self.spinner.set_spinning(view.loading);

        match &view.error {
            Some(message) => {
                self.error_label.set_text(message);
                self.error_label.set_visible(true);
            }
            None => self.error_label.set_visible(false),
        }

        match view.empty_notice {
            Some(notice) => {
                self.empty_label.set_text(notice);
                self.empty_label.set_visible(true);
            }
            None => self.empty_label.set_visible(false),
        }

        self.sync_columns(view);
        self.sync_tiles(view);
    }

    fn sync_columns(&self, view: &GridView) {
        let mut columns = self.columns.borrow_mut();
        if columns.len() != view.columns.len() {
            for fixed in columns.drain(..) {
                self.columns_box.remove(&fixed);
            }
            self.mounted.borrow_mut().clear();
            for _ in &view.columns {
                let fixed = Fixed::new();
                fixed.set_valign(Align::Start);
                self.columns_box.append(&fixed);
                columns.push(fixed);
            }
        }
        for (fixed, column) in columns.iter().zip(&view.columns) {
            fixed.set_size_request(
                column.width_px.round() as i32,
                column.height_px.ceil() as i32,
            );
        }
    }

    fn sync_tiles(&self, view: &GridView) {
        let columns = self.columns.borrow();
        let mut mounted = self.mounted.borrow_mut();

        let mut wanted: HashMap<usize, (usize, &PhotoTile, f64)> = HashMap::new();
        for (index, column) in view.columns.iter().enumerate() {
            for tile in &column.tiles {
                wanted.insert(tile.photo_index, (index, tile, column.width_px));
            }
        }

        mounted.retain(|photo_index, tile| {
            let keep = wanted
                .get(photo_index)
                .is_some_and(|(column, next, _)| *column == tile.column && next.id == tile.id);
            if !keep {
                columns[tile.column].remove(&tile.picture);
            }
            keep
        });

        for (photo_index, (column, tile, width_px)) in wanted {
            let fixed = &columns[column];
            if let Some(existing) = mounted.get_mut(&photo_index) {
                if existing.top_px != tile.top_px || existing.height_px != tile.height_px {
                    existing
                        .picture
                        .set_size_request(width_px.round() as i32, tile.height_px.round() as i32);
                    fixed.move_(&existing.picture, 0.0, tile.top_px);
                    existing.top_px = tile.top_px;
                    existing.height_px = tile.height_px;
                }
                continue;
            }

            let picture = self.build_tile(tile, width_px);
            fixed.put(&picture, 0.0, tile.top_px);
            mounted.insert(
                photo_index,
                MountedTile {
                    id: tile.id.clone(),
                    column,
                    picture,
                    top_px: tile.top_px,
                    height_px: tile.height_px,
                },
            );
        }
    }

    fn build_tile(&self, tile: &PhotoTile, width_px: f64) -> Picture {
        let picture = Picture::new();
        picture.set_widget_name(TestId::PhotoItem.as_str());
        picture.add_css_class("photo-item");
        picture.set_content_fit(ContentFit::Cover);
        picture.set_can_shrink(true);
        picture.set_alternative_text(Some(&tile.alt));
        picture.set_tooltip_text(Some(&tile.alt));
        picture.set_size_request(width_px.round() as i32, tile.height_px.round() as i32);

        if let Some(url) = &tile.thumbnail_url {
            load_into(&picture, url, THUMBNAIL_EDGE);
        }

        let click = GestureClick::new();
        let on_open = self.on_open.clone();
        let id = tile.id.clone();
        click.connect_released(move |_, _, _, _| {
            if let Some(ref callback) = *on_open.borrow() {
                callback(id.clone());
            }
        });
        picture.add_controller(click);
        picture
    }
}

impl Default for MasonryView {
    fn default() -> Self {
        Self::new()
    }
}
