use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use mosaic::app::MosaicApp;
use mosaic::config::{Config, ACCESS_KEY_ENV};
use mosaic::source::{PhotoSource, UnsplashSource};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mosaic=info".parse().context("Invalid log directive")?),
        )
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref()).context("Failed to load configuration")?;
    let access_key = config
        .access_key
        .clone()
        .with_context(|| format!("No Unsplash access key configured; set {ACCESS_KEY_ENV}"))?;

    tracing::info!(api = %config.api_base_url, per_page = config.per_page, "Starting mosaic");
    let source: Arc<dyn PhotoSource> =
        Arc::new(UnsplashSource::new(config.api_base_url.clone(), access_key));

    let app = MosaicApp::new(config, source);
    let code = app.run();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
