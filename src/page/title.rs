// src/page/title.rs
// =============================================================================
// Page identity: the (site, title) pair every warming request is keyed on,
// plus the lead image width hint sent with the lead request.
// =============================================================================

use super::site::WikiSite;
use crate::error::PageError;
use std::fmt;

// Thumbnail widths the image servers pre-render. Asking for one of these
// keeps the lead image URL identical to what the reader will request later.
const IMAGE_WIDTH_BUCKETS: [u32; 8] = [320, 640, 800, 1024, 1280, 1920, 2560, 2880];

/// A page on a wiki site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageTitle {
    site: WikiSite,
    prefixed_text: String,
}

impl PageTitle {
    /// Builds a title, using underscores for spaces like wiki URLs do
    pub fn new(site: WikiSite, text: &str) -> Result<Self, PageError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PageError::EmptyTitle);
        }

        Ok(Self {
            site,
            prefixed_text: text.replace(' ', "_"),
        })
    }

    pub fn site(&self) -> &WikiSite {
        &self.site
    }

    /// Title including any namespace prefix, e.g. `Talk:Rust`
    pub fn prefixed_text(&self) -> &str {
        &self.prefixed_text
    }
}

impl fmt::Display for PageTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.prefixed_text, self.site)
    }
}

/// Rounds a requested width up to the nearest pre-rendered thumbnail width.
/// Anything wider than the largest bucket gets the largest bucket.
pub fn lead_image_width(requested: u32) -> u32 {
    IMAGE_WIDTH_BUCKETS
        .iter()
        .copied()
        .find(|bucket| *bucket >= requested)
        .unwrap_or(IMAGE_WIDTH_BUCKETS[IMAGE_WIDTH_BUCKETS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> WikiSite {
        WikiSite::parse("en.wikipedia.org").unwrap()
    }

    #[test]
    fn test_title_uses_underscores() {
        let title = PageTitle::new(site(), " Rust (programming language) ").unwrap();
        assert_eq!(title.prefixed_text(), "Rust_(programming_language)");
    }

    #[test]
    fn test_empty_title_rejected() {
        assert_eq!(PageTitle::new(site(), "   "), Err(PageError::EmptyTitle));
    }

    #[test]
    fn test_lead_image_width_buckets() {
        assert_eq!(lead_image_width(0), 320);
        assert_eq!(lead_image_width(320), 320);
        assert_eq!(lead_image_width(321), 640);
        assert_eq!(lead_image_width(1080), 1280);
        assert_eq!(lead_image_width(10_000), 2880);
    }
}
