// src/config.rs
// =============================================================================
// Runtime settings for the warmer.
//
// The CLI fills these in from flags (each flag can also come from an
// environment variable, see cli.rs). Library users can start from
// `WarmerConfig::default()` and override what they need.
// =============================================================================

use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LEAD_IMAGE_WIDTH: u32 = 640;
pub const DEFAULT_CACHE_MAX_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmerConfig {
    /// Per-request timeout applied by the HTTP client
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Screen width the lead image is requested for, before bucketing
    pub lead_image_width: u32,
    /// Upper bound on the bytes held by the response cache
    pub cache_max_bytes: u64,
}

impl Default for WarmerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            lead_image_width: DEFAULT_LEAD_IMAGE_WIDTH,
            cache_max_bytes: DEFAULT_CACHE_MAX_BYTES,
        }
    }
}

pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
