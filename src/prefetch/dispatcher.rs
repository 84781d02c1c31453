// src/prefetch/dispatcher.rs
// =============================================================================
// Fire-and-forget image prefetching.
//
// How it works:
// 1. Resolve every URL against the site (protocol-relative -> absolute)
// 2. Drop duplicates that only differed in spelling
// 3. Spawn one detached task per URL; nobody awaits them
// 4. Each task GETs its URL and reads the body to the end
//
// Step 4 reads bytes we never look at: the cache behind the HTTP client
// only writes an entry once the body was consumed.
//
// A failing fetch is logged and forgotten. It has no effect on its
// siblings and is never retried.
//
// Tasks go to the runtime that was current when the dispatcher was built,
// so `dispatch` itself can be called from any thread.
// =============================================================================

use super::in_flight::InFlight;
use crate::error::WarmerError;
use crate::http::HttpClient;
use crate::page::{resolve_protocol_relative_url, WikiSite};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct PrefetchDispatcher {
    http: Arc<dyn HttpClient>,
    in_flight: InFlight,
    runtime: Handle,
}

impl PrefetchDispatcher {
    /// Captures the current tokio runtime; fails when there is none.
    pub fn new(http: Arc<dyn HttpClient>) -> Result<Self, WarmerError> {
        Self::with_tracker(http, InFlight::new())
    }

    /// Shares an existing tracker, so one `wait_idle` covers more than
    /// just image fetches
    pub fn with_tracker(http: Arc<dyn HttpClient>, in_flight: InFlight) -> Result<Self, WarmerError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(http, in_flight, runtime))
    }

    pub fn with_runtime(http: Arc<dyn HttpClient>, in_flight: InFlight, runtime: Handle) -> Self {
        Self {
            http,
            in_flight,
            runtime,
        }
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Starts one background fetch per distinct resolved URL and returns
    /// straight away.
    pub fn dispatch<I, S>(&self, site: &WikiSite, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let resolved: HashSet<String> = urls
            .into_iter()
            .map(|url| resolve_protocol_relative_url(site, url.as_ref()))
            .collect();

        debug!(site = %site, count = resolved.len(), "dispatching image prefetches");

        for url in resolved {
            let guard = self.in_flight.enter();
            let http = Arc::clone(&self.http);

            self.runtime.spawn(async move {
                prefetch_one(http.as_ref(), &url).await;
                drop(guard);
            });
        }
    }
}

async fn prefetch_one(http: &dyn HttpClient, url: &str) {
    let response = match http.get(url).await {
        Ok(response) => response,
        Err(e) => {
            warn!(url, error = %e, "image prefetch failed");
            return;
        }
    };

    let status = response.status();
    match response.drain().await {
        Ok(bytes) => debug!(url, status, bytes, "image prefetched"),
        Err(e) => warn!(url, status, error = %e, "image body could not be read"),
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why spawn instead of join_all / buffer_unordered?
//    - join_all would make the caller wait for every image
//    - A spawned task runs on its own; dropping its JoinHandle detaches it
//    - Nothing here needs the result, so nobody keeps the handle
//
// 2. Why Handle::spawn instead of tokio::spawn?
//    - tokio::spawn panics on a thread that has no runtime
//    - Handle::try_current() in the constructor turns that into an Err
//    - Handle::spawn works from any thread once the handle is held
//
// 3. Why Arc<dyn HttpClient>?
//    - Every spawned task needs the client, and tasks must own their data
//    - Arc::clone only bumps a reference count, the client is shared
//    - dyn HttpClient lets tests pass a fake instead of reqwest
//
// 4. Why read a body we never use?
//    - The cache writes an entry only after the last chunk was read
//    - drain() reads until the body reports its end, then drops it
// -----------------------------------------------------------------------------
