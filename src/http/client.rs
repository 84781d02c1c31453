// src/http/client.rs
// =============================================================================
// The HTTP seam of the warmer.
//
// Both page parts and images go through one `HttpClient`. The important rule
// lives on `HttpResponse`: a body that was handed out must be read to the
// end (`drain` or `text`) before it is dropped, because the cache behind the
// client only keeps an entry once it has seen the whole body.
//
// Rust concepts:
// - Traits: HttpClient and ResponseBody let tests swap in fakes
// - Trait objects: Box<dyn ResponseBody> hides which body type we got
// - async-trait: async fn in traits that can be used as trait objects
// =============================================================================

use crate::error::FetchError;
use async_trait::async_trait;
use std::fmt;

/// A response body that is read chunk by chunk
#[async_trait]
pub trait ResponseBody: Send {
    /// Returns the next chunk, or None once the body is exhausted
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError>;
}

/// Anything that can GET a URL
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Performs a GET. Any status code is a response, not an error; only a
    /// request that produced no response at all fails.
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// Status plus an optional, not yet read body
pub struct HttpResponse {
    url: String,
    status: u16,
    body: Option<Box<dyn ResponseBody>>,
}

impl HttpResponse {
    pub fn new(url: impl Into<String>, status: u16, body: Option<Box<dyn ResponseBody>>) -> Self {
        Self {
            url: url.into(),
            status,
            body,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Reads the body to the end and throws the bytes away.
    ///
    /// Returns how many bytes were read (0 when there was no body). The body
    /// is released when this returns, whether or not reading succeeded.
    pub async fn drain(self) -> Result<u64, FetchError> {
        let Some(mut body) = self.body else {
            return Ok(0);
        };

        let mut total = 0u64;
        while let Some(chunk) = body.chunk().await? {
            total += chunk.len() as u64;
        }

        Ok(total)
    }

    /// Reads the whole body as UTF-8 text. None when there was no body.
    pub async fn text(self) -> Result<Option<String>, FetchError> {
        let Some(mut body) = self.body else {
            return Ok(None);
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = body.chunk().await? {
            bytes.extend_from_slice(&chunk);
        }

        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| FetchError::Decode {
                url: self.url,
                message: e.to_string(),
            })
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("url", &self.url)
            .field("status", &self.status)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}
