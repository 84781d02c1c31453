// src/test_support.rs
// =============================================================================
// Hand-written fakes for the network collaborators, shared by unit tests.
//
// FakeHttp answers GETs from a routing table and records two things:
// - every URL that was requested
// - every URL whose body was read to the end
// FakeSource answers lead/remaining requests with canned results.
// =============================================================================

use crate::error::FetchError;
use crate::http::{HttpClient, HttpResponse, ResponseBody};
use crate::page::{PageTitle, WikiSite};
use crate::source::{DocumentSource, FetchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn site() -> WikiSite {
    WikiSite::parse("en.wikipedia.org").unwrap()
}

pub fn title(text: &str) -> PageTitle {
    PageTitle::new(site(), text).unwrap()
}

#[derive(Debug, Clone)]
enum Route {
    Respond {
        status: u16,
        body: Option<Vec<u8>>,
        delay: Duration,
    },
    Fail {
        delay: Duration,
    },
}

#[derive(Default)]
pub struct FakeHttp {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<String>>,
    drained: Arc<Mutex<Vec<String>>>,
}

impl FakeHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, url: &str, status: u16, body: Option<&str>) {
        self.respond_after(url, status, body, Duration::ZERO);
    }

    pub fn respond_after(&self, url: &str, status: u16, body: Option<&str>, delay: Duration) {
        let route = Route::Respond {
            status,
            body: body.map(|b| b.as_bytes().to_vec()),
            delay,
        };
        self.routes.lock().unwrap().insert(url.to_string(), route);
    }

    pub fn fail(&self, url: &str) {
        self.fail_after(url, Duration::ZERO);
    }

    pub fn fail_after(&self, url: &str, delay: Duration) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route::Fail { delay });
    }

    /// URLs requested so far, sorted
    pub fn requests(&self) -> Vec<String> {
        let mut requests = self.requests.lock().unwrap().clone();
        requests.sort();
        requests
    }

    /// URLs whose body was read to the end, sorted
    pub fn drained(&self) -> Vec<String> {
        let mut drained = self.drained.lock().unwrap().clone();
        drained.sort();
        drained
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());

        // Unrouted URLs behave like a small image
        let route = self
            .routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(Route::Respond {
                status: 200,
                body: Some(b"\x89PNG".to_vec()),
                delay: Duration::ZERO,
            });

        match route {
            Route::Fail { delay } => {
                tokio::time::sleep(delay).await;
                Err(FetchError::Transport {
                    url: url.to_string(),
                    message: "connection reset".to_string(),
                })
            }
            Route::Respond { status, body, delay } => {
                tokio::time::sleep(delay).await;
                let body = body.map(|data| {
                    Box::new(TrackedBody {
                        url: url.to_string(),
                        data: Some(data),
                        drained: Arc::clone(&self.drained),
                    }) as Box<dyn ResponseBody>
                });
                Ok(HttpResponse::new(url, status, body))
            }
        }
    }
}

// Records its URL once the final (None) chunk has been handed out
struct TrackedBody {
    url: String,
    data: Option<Vec<u8>>,
    drained: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ResponseBody for TrackedBody {
    async fn chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError> {
        if let Some(data) = self.data.take() {
            return Ok(Some(data));
        }
        self.drained.lock().unwrap().push(self.url.clone());
        Ok(None)
    }
}

#[derive(Clone)]
pub enum Part {
    Ok(FetchResult),
    Fail,
}

pub struct FakeSource {
    lead: Part,
    remaining: Part,
    lead_delay: Duration,
    remaining_delay: Duration,
    lead_widths: Mutex<Vec<u32>>,
}

impl FakeSource {
    pub fn new(lead: Part, remaining: Part) -> Self {
        Self {
            lead,
            remaining,
            lead_delay: Duration::ZERO,
            remaining_delay: Duration::ZERO,
            lead_widths: Mutex::new(Vec::new()),
        }
    }

    pub fn with_bodies(lead: &str, remaining: &str) -> Self {
        Self::new(
            Part::Ok(FetchResult::with_body(200, lead)),
            Part::Ok(FetchResult::with_body(200, remaining)),
        )
    }

    pub fn delays(mut self, lead: Duration, remaining: Duration) -> Self {
        self.lead_delay = lead;
        self.remaining_delay = remaining;
        self
    }

    pub fn lead_widths(&self) -> Vec<u32> {
        self.lead_widths.lock().unwrap().clone()
    }

    fn answer(part: &Part, title: &PageTitle) -> Result<FetchResult, FetchError> {
        match part {
            Part::Ok(result) => Ok(result.clone()),
            Part::Fail => Err(FetchError::Transport {
                url: title.prefixed_text().to_string(),
                message: "network unreachable".to_string(),
            }),
        }
    }
}

#[async_trait]
impl DocumentSource for FakeSource {
    async fn lead(&self, title: &PageTitle, lead_image_width: u32) -> Result<FetchResult, FetchError> {
        self.lead_widths.lock().unwrap().push(lead_image_width);
        tokio::time::sleep(self.lead_delay).await;
        Self::answer(&self.lead, title)
    }

    async fn remaining(&self, title: &PageTitle) -> Result<FetchResult, FetchError> {
        tokio::time::sleep(self.remaining_delay).await;
        Self::answer(&self.remaining, title)
    }
}
