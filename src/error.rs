// src/error.rs
// =============================================================================
// Error types for the warming library.
//
// The binary uses anyhow for everything, but library callers get typed
// errors so they can tell a bad status apart from a dropped connection.
// None of these ever reach a user: the warmer only logs them.
// =============================================================================

use thiserror::Error;

/// Failure while fetching a page part or an image.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, reset)
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a status we treat as failure
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The body arrived but could not be decoded
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),
}

impl FetchError {
    /// Converts a reqwest error, keeping the URL for the log line
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            "request timed out".to_string()
        } else if error.is_connect() {
            format!("connection failed: {}", error)
        } else {
            error.to_string()
        };

        FetchError::Transport {
            url: url.to_string(),
            message,
        }
    }
}

/// Failure while building a site or a page title from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("invalid site '{0}': expected a host such as en.wikipedia.org")]
    InvalidSite(String),

    #[error("page title must not be empty")]
    EmptyTitle,
}

/// Failure while building the warmer or the prefetch dispatcher.
#[derive(Debug, Error)]
pub enum WarmerError {
    /// Background work is spawned on the runtime captured at construction
    #[error("no tokio runtime is running: build the warmer from inside one")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
