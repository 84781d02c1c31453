// src/http/mod.rs
// =============================================================================
// HTTP access shared by every fetch the warmer makes.
//
// Submodules:
// - client: the HttpClient / ResponseBody traits and HttpResponse
// - cache: the reqwest implementation with its in-memory response cache
// =============================================================================

mod cache;
mod client;

pub use cache::{CacheStats, CachingHttpClient, ResponseCache};
pub use client::{HttpClient, HttpResponse, ResponseBody};
