// src/http/cache.rs
// =============================================================================
// A reqwest-backed HttpClient with an in-memory response cache.
//
// How it works:
// 1. A GET for a URL already in the cache is answered from memory
// 2. Otherwise the request goes to the network and the body is wrapped
// 3. The wrapper copies every chunk it hands out
// 4. Only when the last chunk has been read is the copy stored
//
// Step 4 is why every caller must drain bodies: a response dropped halfway
// never lands in the cache.
// =============================================================================

use super::client::{HttpClient, HttpResponse, ResponseBody};
use crate::config::{WarmerConfig, DEFAULT_CACHE_MAX_BYTES};
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::trace;
use url::Url;

/// Bodies kept by URL, bounded by a total byte budget.
///
/// When an insert would go over budget the least recently used entries are
/// evicted first. A body larger than the whole budget is not stored.
#[derive(Debug)]
pub struct ResponseCache {
    max_bytes: u64,
    entries: Mutex<Entries>,
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, Entry>,
    total_bytes: u64,
    // Monotonic use counter, bumped on every get and insert
    clock: u64,
}

#[derive(Debug)]
struct Entry {
    body: Arc<Vec<u8>>,
    last_used: u64,
}

impl Entries {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn remove(&mut self, url: &str) {
        if let Some(old) = self.map.remove(url) {
            self.total_bytes -= old.body.len() as u64;
        }
    }

    fn evict_oldest(&mut self) -> bool {
        let oldest = self
            .map
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(url, _)| url.clone());

        match oldest {
            Some(url) => {
                trace!(%url, "evicted");
                self.remove(&url);
                true
            }
            None => false,
        }
    }
}

/// Point-in-time view of the cache, printed by the CLI
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub total_bytes: u64,
    pub max_bytes: u64,
    pub urls: Vec<String>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::with_max_bytes(DEFAULT_CACHE_MAX_BYTES)
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_bytes(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            entries: Mutex::new(Entries::default()),
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub fn get(&self, url: &str) -> Option<Arc<Vec<u8>>> {
        let mut entries = self.lock();
        let now = entries.tick();
        let entry = entries.map.get_mut(url)?;
        entry.last_used = now;
        Some(Arc::clone(&entry.body))
    }

    /// Stores a body, evicting least recently used entries to make room.
    /// Returns false when the body alone exceeds the budget.
    pub fn insert(&self, url: &str, body: Vec<u8>) -> bool {
        let size = body.len() as u64;
        let mut entries = self.lock();

        // A replaced entry must not count against the new one
        entries.remove(url);

        if size > self.max_bytes {
            trace!(url, size, max = self.max_bytes, "too large to cache");
            return false;
        }

        while entries.total_bytes + size > self.max_bytes {
            if !entries.evict_oldest() {
                break;
            }
        }

        let last_used = entries.tick();
        entries.total_bytes += size;
        entries.map.insert(
            url.to_string(),
            Entry {
                body: Arc::new(body),
                last_used,
            },
        );
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().map.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// URLs come back sorted so output is stable between runs
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        let mut urls: Vec<String> = entries.map.keys().cloned().collect();
        urls.sort();

        CacheStats {
            entries: entries.map.len(),
            total_bytes: entries.total_bytes,
            max_bytes: self.max_bytes,
            urls,
        }
    }

    // Every mutation leaves the map and byte total consistent before it can
    // panic, so a poisoned lock is still safe to use
    fn lock(&self) -> std::sync::MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The shared client used for page parts and images alike
#[derive(Debug, Clone)]
pub struct CachingHttpClient {
    client: Client,
    cache: Arc<ResponseCache>,
}

impl CachingHttpClient {
    /// Builds the reqwest client from the warmer configuration
    pub fn from_config(config: &WarmerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        let cache = ResponseCache::with_max_bytes(config.cache_max_bytes);
        Ok(Self::with_cache(client, cache))
    }

    pub fn with_client(client: Client) -> Self {
        Self::with_cache(client, ResponseCache::new())
    }

    pub fn with_cache(client: Client, cache: ResponseCache) -> Self {
        Self {
            client,
            cache: Arc::new(cache),
        }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }
}

#[async_trait]
impl HttpClient for CachingHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        if let Some(bytes) = self.cache.get(url) {
            trace!(url, "cache hit");
            let body = MemoryBody { data: Some(bytes) };
            return Ok(HttpResponse::new(url, StatusCode::OK.as_u16(), Some(Box::new(body))));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();

        // These statuses never carry a body
        if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED {
            return Ok(HttpResponse::new(url, status.as_u16(), None));
        }

        let body = CachingBody {
            url: url.to_string(),
            response,
            buffer: Vec::new(),
            // Error pages are not worth keeping
            cache: status.is_success().then(|| Arc::clone(&self.cache)),
        };

        Ok(HttpResponse::new(url, status.as_u16(), Some(Box::new(body))))
    }
}

// Network body that stores itself once fully read
struct CachingBody {
    url: String,
    response: reqwest::Response,
    buffer: Vec<u8>,
    cache: Option<Arc<ResponseCache>>,
}

#[async_trait]
impl ResponseBody for CachingBody {
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError> {
        match self.response.chunk().await {
            Ok(Some(bytes)) => {
                if self.cache.is_some() {
                    self.buffer.extend_from_slice(&bytes);
                }
                Ok(Some(bytes.to_vec()))
            }
            Ok(None) => {
                if let Some(cache) = self.cache.take() {
                    trace!(url = %self.url, bytes = self.buffer.len(), "cached");
                    cache.insert(&self.url, std::mem::take(&mut self.buffer));
                }
                Ok(None)
            }
            Err(e) => {
                // A broken body must not end up half-written in the cache
                self.cache = None;
                Err(FetchError::from_reqwest(&self.url, e))
            }
        }
    }
}

// Body served from the cache in a single chunk
struct MemoryBody {
    data: Option<Arc<Vec<u8>>>,
}

#[async_trait]
impl ResponseBody for MemoryBody {
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError> {
        Ok(self.data.take().map(|bytes| bytes.to_vec()))
    }
}
