use std::sync::Arc;

use gtk4::prelude::*;
use gtk4::Application;

use crate::config::Config;
use crate::source::PhotoSource;
use crate::ui::MainWindow;

const APP_ID: &str = "com.mosaic.PhotoFeed";

pub struct MosaicApp {
    app: Application,
}

impl MosaicApp {
    pub fn new(config: Config, source: Arc<dyn PhotoSource>) -> Self {
        let app = Application::builder().application_id(APP_ID).build();

        app.connect_activate(move |app| Self::on_activate(app, &config, Arc::clone(&source)));

        Self { app }
    }

    /// Run the main loop. Command-line arguments are handled by `main`,
    /// so GTK only sees the program name.
    pub fn run(&self) -> i32 {
        let program: Vec<String> = std::env::args().take(1).collect();
        self.app.run_with_args(&program).into()
    }

    fn on_activate(app: &Application, config: &Config, source: Arc<dyn PhotoSource>) {
        match MainWindow::new(app, config, source) {
            Ok(window) => {
                window.present();
                // Keep the window alive by storing it on the Application.
                unsafe {
                    app.set_data("main-window", window);
                }
            }
            Err(err) => {
                tracing::error!(error = ?err, "Failed to create main window");
                app.quit();
            }
        }
    }
}
