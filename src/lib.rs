// src/lib.rs
// =============================================================================
// page-warmer: warm an HTTP cache with every image a wiki page references.
//
// Flow for one page:
//
//   CacheWarmer::warm(title)                       (returns immediately)
//     -> lead + remaining fetched concurrently     (both must succeed)
//     -> image URLs extracted from both, unioned
//     -> one detached, drained fetch per image     (failures only logged)
//
// Modules, leaves first:
// - extract: markup -> image URLs (scraper)
// - page: WikiSite, PageTitle, URL resolution
// - http: HttpClient trait and the reqwest client with its response cache
// - source: lead / remaining page parts over the REST API
// - prefetch: the fire-and-forget image dispatcher
// - warm: the joiner and the CacheWarmer entry point
// =============================================================================

pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod logging;
pub mod page;
pub mod prefetch;
pub mod source;
pub mod warm;

#[cfg(test)]
mod test_support;

pub use config::WarmerConfig;
pub use error::{FetchError, PageError, WarmerError};
pub use page::{PageTitle, WikiSite};
pub use warm::CacheWarmer;
