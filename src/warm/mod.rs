// src/warm/mod.rs
// =============================================================================
// Cache warming for a page.
//
// Submodules:
// - joiner: fetches both page parts and unions their image URLs
// - warmer: the fire-and-forget entry point tying joiner and dispatcher
// =============================================================================

mod joiner;
mod warmer;

pub use joiner::fetch_and_extract_image_urls;
pub use warmer::CacheWarmer;
