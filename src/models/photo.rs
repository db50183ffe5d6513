/// Fallback alt text when the provider sends none.
pub const DEFAULT_ALT_TEXT: &str = "Unsplash photo";

/// One entry of a feed or search page.
///
/// Immutable once fetched. The engine only reads `width`/`height` (for the
/// aspect ratio) and `id`; the URLs and alt text are carried through to the
/// view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoSummary {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub thumbnail_url: Option<String>,
    pub regular_url: Option<String>,
    pub alt_text: Option<String>,
}

impl PhotoSummary {
    /// Create a summary with just the fields the layout needs.
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            thumbnail_url: None,
            regular_url: None,
            alt_text: None,
        }
    }

    pub fn with_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }

    pub fn with_regular(mut self, url: impl Into<String>) -> Self {
        self.regular_url = Some(url.into());
        self
    }

    pub fn with_alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = Some(alt.into());
        self
    }

    /// Height divided by width. Degenerate dimensions render square.
    pub fn height_ratio(&self) -> f64 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.height as f64 / self.width as f64
        }
    }

    /// Rendered height when scaled to `column_width` pixels.
    pub fn scaled_height(&self, column_width: f64) -> f64 {
        self.height_ratio() * column_width
    }

    /// Alt text, or the generic fallback.
    pub fn alt_or_default(&self) -> &str {
        match self.alt_text.as_deref() {
            Some(alt) if !alt.is_empty() => alt,
            _ => DEFAULT_ALT_TEXT,
        }
    }
}

/// Full record for the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDetail {
    pub summary: PhotoSummary,
    pub description: Option<String>,
    pub photographer: String,
    /// Creation timestamp as sent by the provider (RFC 3339).
    pub created_at: String,
}

impl PhotoDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_ratio() {
        let photo = PhotoSummary::new("a", 800, 1200);
        assert!((photo.height_ratio() - 1.5).abs() < f64::EPSILON);
        assert!((photo.scaled_height(200.0) - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_dimensions_render_square() {
        assert_eq!(PhotoSummary::new("a", 0, 500).height_ratio(), 1.0);
        assert_eq!(PhotoSummary::new("b", 500, 0).height_ratio(), 1.0);
    }

    #[test]
    fn test_alt_fallback() {
        let photo = PhotoSummary::new("a", 1, 1);
        assert_eq!(photo.alt_or_default(), DEFAULT_ALT_TEXT);
        let photo = photo.with_alt_text("");
        assert_eq!(photo.alt_or_default(), DEFAULT_ALT_TEXT);
        let photo = photo.with_alt_text("a red fox");
        assert_eq!(photo.alt_or_default(), "a red fox");
    }
}
