// Detail page for a single photo

use gtk4::prelude::*;
use gtk4::{
    Align, Box as GtkBox, Button, ContentFit, Label, Orientation, Picture, PolicyType,
    ScrolledWindow, Spinner,
};

use super::thumbnail_loader::{load_into, FULL_EDGE};
use crate::view::{DetailView, PhotoPage, TestId};

pub struct DetailPage {
    root: ScrolledWindow,
    spinner: Spinner,
    error_label: Label,
    not_found_label: Label,
    content: GtkBox,
    back_button: Button,
    title: Label,
    picture: Picture,
    photographer: Label,
    date: Label,
    description: Label,
}

fn info_label() -> Label {
    let label = Label::new(None);
    label.set_halign(Align::Start);
    label.set_wrap(true);
    label
}

impl DetailPage {
    pub fn new() -> Self {
        let body = GtkBox::new(Orientation::Vertical, 12);
        body.set_margin_top(16);
        body.set_margin_bottom(16);
        body.set_margin_start(16);
        body.set_margin_end(16);

        let spinner = Spinner::new();
        spinner.set_widget_name(TestId::LoadingSpinner.as_str());

        let error_label = Label::new(None);
        error_label.set_widget_name(TestId::ErrorMessage.as_str());
        error_label.add_css_class("error");

        let not_found_label = Label::new(None);
        not_found_label.set_widget_name(TestId::PhotoNotFoundError.as_str());
        not_found_label.add_css_class("error");

        let content = GtkBox::new(Orientation::Vertical, 8);

        let back_button = Button::new();
        back_button.set_widget_name(TestId::BackButton.as_str());
        back_button.set_halign(Align::Start);

        let title = Label::new(None);
        title.add_css_class("title-1");
        title.set_halign(Align::Start);
        title.set_wrap(true);

        let picture = Picture::new();
        picture.set_content_fit(ContentFit::Contain);
        picture.set_can_shrink(true);
        picture.set_size_request(-1, 480);

        let photographer = info_label();
        let date = info_label();
        let description = info_label();

        content.append(&back_button);
        content.append(&title);
        content.append(&picture);
        content.append(&photographer);
        content.append(&date);
        content.append(&description);

        body.append(&spinner);
        body.append(&error_label);
        body.append(&not_found_label);
        body.append(&content);

        let root = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Never)
            .child(&body)
            .vexpand(true)
            .build();

        Self {
            root,
            spinner,
            error_label,
            not_found_label,
            content,
            back_button,
            title,
            picture,
            photographer,
            date,
            description,
        }
    }

    pub fn widget(&self) -> &ScrolledWindow {
        &self.root
    }

    pub fn connect_back<F: Fn() + 'static>(&self, callback: F) {
        self.back_button.connect_clicked(move |_| callback());
    }

    pub fn render(&self, view: &DetailView) {
        let loading = matches!(view, DetailView::Loading);
        self.spinner.set_visible(loading);
        self.spinner.set_spinning(loading);
        self.error_label.set_visible(false);
        self.not_found_label.set_visible(false);
        self.content.set_visible(false);

        match view {
            DetailView::Loading => self.picture.set_paintable(None::<&gtk4::gdk::Paintable>),
            DetailView::Error { message } => {
                self.error_label.set_text(message);
                self.error_label.set_visible(true);
            }
            DetailView::NotFound { message } => {
                self.not_found_label.set_text(message);
                self.not_found_label.set_visible(true);
            }
            DetailView::Loaded(page) => self.show_page(page),
        }
    }

    fn show_page(&self, page: &PhotoPage) {
        self.back_button.set_label(page.back_label);
        self.back_button.set_tooltip_text(Some(&page.back_href));
        self.title.set_text(page.title.as_deref().unwrap_or_default());
        self.title.set_visible(page.title.is_some());
        self.picture.set_alternative_text(Some(&page.alt));
        if let Some(url) = &page.image_url {
            load_into(&self.picture, url, FULL_EDGE);
        }
        self.photographer.set_text(&page.photographer_line);
        self.date.set_text(&page.date_line);
        self.description.set_text(&page.description_line);
        self.content.set_visible(true);
    }
}

impl Default for DetailPage {
    fn default() -> Self {
        Self::new()
    }
}
