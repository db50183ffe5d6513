//! Configuration loading.
//!
//! Precedence, lowest to highest: built-in defaults, the TOML file, then
//! environment variables. A missing file is not an error.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::feed::controller::DEFAULT_PER_PAGE;
use crate::feed::queue::DEFAULT_WORKERS;
use crate::source::unsplash::DEFAULT_API_BASE_URL;

pub const ACCESS_KEY_ENV: &str = "MOSAIC_ACCESS_KEY";
pub const FALLBACK_ACCESS_KEY_ENV: &str = "UNSPLASH_ACCESS_KEY";
pub const API_BASE_URL_ENV: &str = "MOSAIC_API_BASE_URL";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Invalid TOML in {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub base_column_width: Option<f64>,
    #[serde(default)]
    pub gutter: Option<f64>,
    #[serde(default)]
    pub gap: Option<f64>,
    /// Viewport heights kept mounted above and below the viewport.
    #[serde(default)]
    pub buffer_multiplier: Option<f64>,
    /// Extra viewport heights before the end that trigger the next page.
    #[serde(default)]
    pub prefetch_margin: Option<f64>,
    #[serde(default)]
    pub fetch_workers: Option<usize>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub access_key: Option<String>,
    pub api_base_url: String,
    pub per_page: u32,
    pub base_column_width: f64,
    pub gutter: f64,
    pub gap: f64,
    pub buffer_multiplier: f64,
    pub prefetch_margin: f64,
    pub fetch_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            base_column_width: 300.0,
            gutter: 10.0,
            gap: 15.0,
            buffer_multiplier: 5.0,
            prefetch_margin: 0.5,
            fetch_workers: DEFAULT_WORKERS,
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`, then
    /// apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);
        let file = match path {
            Some(path) => load_config_file(&path)?,
            None => None,
        };
        let config = Self::merge(file).with_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with whatever the file sets.
    pub fn merge(file: Option<ConfigFile>) -> Self {
        let defaults = Self::default();
        let Some(file) = file else {
            return defaults;
        };

        Self {
            access_key: file.access_key.or(defaults.access_key),
            api_base_url: file.api_base_url.unwrap_or(defaults.api_base_url),
            per_page: file.per_page.unwrap_or(defaults.per_page),
            base_column_width: file.base_column_width.unwrap_or(defaults.base_column_width),
            gutter: file.gutter.unwrap_or(defaults.gutter),
            gap: file.gap.unwrap_or(defaults.gap),
            buffer_multiplier: file.buffer_multiplier.unwrap_or(defaults.buffer_multiplier),
            prefetch_margin: file.prefetch_margin.unwrap_or(defaults.prefetch_margin),
            fetch_workers: file.fetch_workers.unwrap_or(defaults.fetch_workers),
        }
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ACCESS_KEY_ENV).or_else(|| non_empty(FALLBACK_ACCESS_KEY_ENV)) {
            self.access_key = Some(key.trim().to_string());
        }
        if let Some(url) = non_empty(API_BASE_URL_ENV) {
            self.api_base_url = url.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 {
            return Err(invalid("per_page", "must be at least 1"));
        }
        if !(self.base_column_width.is_finite() && self.base_column_width > 0.0) {
            return Err(invalid("base_column_width", "must be a positive number"));
        }
        for (field, value) in [
            ("gutter", self.gutter),
            ("gap", self.gap),
            ("buffer_multiplier", self.buffer_multiplier),
            ("prefetch_margin", self.prefetch_margin),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        // A container exactly one base column wide must still get a
        // positive column width.
        if self.gutter >= self.base_column_width.floor() {
            return Err(invalid("gutter", "must be smaller than base_column_width"));
        }
        if self.fetch_workers == 0 {
            return Err(invalid("fetch_workers", "must be at least 1"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url", "must not be empty"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

/// `$XDG_CONFIG_HOME/mosaic/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "mosaic").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// `Ok(None)` if the file does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!(path = %path.display(), "Loaded config file");
    Ok(Some(file))
}
