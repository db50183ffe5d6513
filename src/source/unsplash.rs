//! HTTP photo source backed by the Unsplash REST API.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use ureq::Agent;

use super::{PhotoSource, SourceError};
use crate::models::{PhotoDetail, PhotoSummary};

pub const DEFAULT_API_BASE_URL: &str = "https://api.unsplash.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ApiPhoto {
    id: String,
    width: u32,
    height: u32,
    #[serde(default)]
    urls: ApiUrls,
    alt_description: Option<String>,
    description: Option<String>,
    user: Option<ApiUser>,
    created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiUrls {
    thumb: Option<String>,
    regular: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiSearchPage {
    #[serde(default)]
    results: Vec<ApiPhoto>,
}

impl ApiPhoto {
    fn into_summary(self) -> PhotoSummary {
        PhotoSummary {
            id: self.id,
            width: self.width,
            height: self.height,
            thumbnail_url: self.urls.thumb,
            regular_url: self.urls.regular,
            alt_text: self.alt_description,
        }
    }

    fn into_detail(self) -> PhotoDetail {
        let description = self.description.clone();
        let photographer = self
            .user
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_default();
        let created_at = self.created_at.clone().unwrap_or_default();
        PhotoDetail {
            summary: self.into_summary(),
            description,
            photographer,
            created_at,
        }
    }
}

/// First entry of a provider `errors` array, if the payload carries one.
fn provider_error(value: &Value) -> Option<String> {
    let errors = value.as_object()?.get("errors")?;
    let first = errors
        .as_array()
        .and_then(|list| list.first())
        .and_then(Value::as_str)
        .unwrap_or("unknown provider error");
    Some(first.to_string())
}

fn parse_value(body: &str) -> Result<Value, SourceError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::Malformed(format!("invalid JSON: {e}")))?;
    if let Some(message) = provider_error(&value) {
        return Err(SourceError::Provider(message));
    }
    Ok(value)
}

fn decode<T: for<'de> Deserialize<'de>>(value: Value) -> Result<T, SourceError> {
    serde_json::from_value(value).map_err(|e| SourceError::Malformed(format!("unexpected payload: {e}")))
}

/// Decode a `/photos` body. A `null` body is an empty page.
pub fn parse_photo_list(body: &str) -> Result<Vec<PhotoSummary>, SourceError> {
    let value = parse_value(body)?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    let photos: Vec<ApiPhoto> = decode(value)?;
    Ok(photos.into_iter().map(ApiPhoto::into_summary).collect())
}

/// Decode a `/search/photos` body; results live under `results`.
pub fn parse_search_page(body: &str) -> Result<Vec<PhotoSummary>, SourceError> {
    let value = parse_value(body)?;
    if value.is_null() {
        return Ok(Vec::new());
    }
    let page: ApiSearchPage = decode(value)?;
    Ok(page.results.into_iter().map(ApiPhoto::into_summary).collect())
}

/// Decode a `/photos/{id}` body. A `null` body means not found.
pub fn parse_photo_detail(body: &str) -> Result<Option<PhotoDetail>, SourceError> {
    let value = parse_value(body)?;
    if value.is_null() {
        return Ok(None);
    }
    let photo: ApiPhoto = decode(value)?;
    Ok(Some(photo.into_detail()))
}

/// Blocking Unsplash client.
pub struct UnsplashSource {
    agent: Agent,
    base_url: String,
    access_key: String,
}

impl UnsplashSource {
    pub fn new(base_url: impl Into<String>, access_key: impl Into<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key: access_key.into(),
        }
    }

    /// GET `path` with `params`; returns the status code and the body text.
    fn get(&self, path: &str, params: &[(&str, String)]) -> Result<(u16, String), SourceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?params, "GET");

        let mut request = self.agent.get(&url);
        for (key, value) in params {
            request = request.query(*key, value);
        }
        let mut response = request
            .query("client_id", &self.access_key)
            .call()
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| SourceError::Network(e.to_string()))?;
        Ok((status, body))
    }

    /// Turn a non-success status into an error, preferring the provider's message.
    fn check_status(status: u16, body: &str) -> Result<(), SourceError> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(provider_error);
        warn!(status, ?message, "Provider returned an error status");
        Err(match message {
            Some(message) => SourceError::Provider(message),
            None => SourceError::Network(format!("HTTP {status}")),
        })
    }

    fn page_params(page: u32, per_page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ]
    }
}

impl PhotoSource for UnsplashSource {
    fn list_page(&self, page: u32, per_page: u32) -> Result<Vec<PhotoSummary>, SourceError> {
        let (status, body) = self.get("/photos", &Self::page_params(page, per_page))?;
        Self::check_status(status, &body)?;
        parse_photo_list(&body)
    }

    fn search_page(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PhotoSummary>, SourceError> {
        let mut params = vec![("query", query.to_string())];
        params.extend(Self::page_params(page, per_page));
        let (status, body) = self.get("/search/photos", &params)?;
        Self::check_status(status, &body)?;
        parse_search_page(&body)
    }

    fn fetch_detail(&self, id: &str) -> Result<Option<PhotoDetail>, SourceError> {
        let path = format!("/photos/{id}");
        let (status, body) = self.get(&path, &[])?;
        if status == 404 {
            return Ok(None);
        }
        Self::check_status(status, &body)?;
        parse_photo_detail(&body)
    }
}
