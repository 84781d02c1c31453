// src/warm/joiner.rs
// =============================================================================
// Fetches both parts of a page at once and collects their image URLs.
//
// The two requests run concurrently and we need BOTH:
// - both succeed: union of the images found in each part
// - either fails: the whole thing fails, no partial set comes out
//
// Prefetching from half a page would waste requests on a page the reader
// cannot open anyway, so a partial result is treated as no result.
// =============================================================================

use crate::error::FetchError;
use crate::extract::extract_image_urls;
use crate::page::PageTitle;
use crate::source::DocumentSource;
use std::collections::HashSet;

/// Fetches lead and remaining parts concurrently and returns every image
/// URL referenced by either, deduplicated. A part without a body adds
/// nothing; an error from either part fails the call.
pub async fn fetch_and_extract_image_urls(
    source: &dyn DocumentSource,
    title: &PageTitle,
    lead_image_width: u32,
) -> Result<HashSet<String>, FetchError> {
    // try_join! polls both together and bails out on the first error
    let (lead, remaining) = futures::try_join!(
        source.lead(title, lead_image_width),
        source.remaining(title)
    )?;

    let mut urls = HashSet::new();
    for part in [lead, remaining] {
        if let Some(body) = part.body {
            urls.extend(extract_image_urls(&body));
        }
    }

    Ok(urls)
}
