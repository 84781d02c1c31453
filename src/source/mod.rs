// src/source/mod.rs
// =============================================================================
// Where page markup comes from.
//
// A page is served in two parts so the reader can show the top of the
// article before the rest has arrived:
// - lead: the introduction (plus the lead image, sized for the screen)
// - remaining: every section after the lead
//
// The warmer only needs the markup of each part, so a source hands back a
// FetchResult holding the status and the markup text, if there was any.
// =============================================================================

mod rest;

pub use rest::RestPageSource;

use crate::error::FetchError;
use crate::page::PageTitle;
use async_trait::async_trait;

/// One page part as seen by the warmer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub status: u16,
    /// Markup of the part. None for "not modified" or an empty payload,
    /// which is not an error.
    pub body: Option<String>,
}

impl FetchResult {
    pub fn with_body(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(body.into()),
        }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: None }
    }
}

/// Fetches the two parts of a page
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// The lead part, with its lead image sized for `lead_image_width`
    async fn lead(&self, title: &PageTitle, lead_image_width: u32) -> Result<FetchResult, FetchError>;

    /// Every section after the lead
    async fn remaining(&self, title: &PageTitle) -> Result<FetchResult, FetchError>;
}
