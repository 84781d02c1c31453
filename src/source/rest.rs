// src/source/rest.rs
// =============================================================================
// This module fetches page parts from the wiki REST API.
//
// Endpoints:
//   {site}/api/rest_v1/page/mobile-sections-lead/{title}?thumbsize={width}
//   {site}/api/rest_v1/page/mobile-sections-remaining/{title}
//
// Both answer with JSON shaped roughly like:
//
//   {
//     "image": { "urls": { "640": "//upload.wikimedia.org/640px-Cat.jpg" } },
//     "sections": [ { "id": 0, "text": "<p>...</p>" }, ... ]
//   }
//
// The "image" block only appears on the lead. We flatten all of it into one
// markup string so the extractor sees the lead image like any other <img>.
//
// Requests go through the shared HttpClient, so the page JSON itself ends up
// in the same cache as the images.
// =============================================================================

use super::{DocumentSource, FetchResult};
use crate::error::FetchError;
use crate::http::{HttpClient, HttpResponse};
use crate::page::PageTitle;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;
use url::Url;

const NOT_MODIFIED: u16 = 304;

#[derive(Debug, Deserialize)]
struct SectionsPayload {
    #[serde(default)]
    image: Option<LeadImage>,
    #[serde(default)]
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct LeadImage {
    // width (as a string key) -> URL
    #[serde(default)]
    urls: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Section {
    #[serde(default)]
    text: String,
}

/// DocumentSource backed by the REST API of a wiki
#[derive(Clone)]
pub struct RestPageSource {
    http: Arc<dyn HttpClient>,
}

impl RestPageSource {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    async fn fetch(&self, url: Url, lead_image_width: Option<u32>) -> Result<FetchResult, FetchError> {
        let response = self.http.get(url.as_str()).await?;
        let status = response.status();

        if status == NOT_MODIFIED {
            release(response).await;
            return Ok(FetchResult::empty(status));
        }

        if !response.is_success() {
            release(response).await;
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = match response.text().await? {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Ok(FetchResult::empty(status)),
        };

        let markup = payload_markup(url.as_str(), &body, lead_image_width)?;
        if markup.trim().is_empty() {
            return Ok(FetchResult::empty(status));
        }

        Ok(FetchResult::with_body(status, markup))
    }
}

#[async_trait]
impl DocumentSource for RestPageSource {
    async fn lead(&self, title: &PageTitle, lead_image_width: u32) -> Result<FetchResult, FetchError> {
        let url = lead_url(title, lead_image_width)?;
        self.fetch(url, Some(lead_image_width)).await
    }

    async fn remaining(&self, title: &PageTitle) -> Result<FetchResult, FetchError> {
        let url = remaining_url(title)?;
        self.fetch(url, None).await
    }
}

fn lead_url(title: &PageTitle, lead_image_width: u32) -> Result<Url, FetchError> {
    let mut url = endpoint(title, "mobile-sections-lead")?;
    url.query_pairs_mut()
        .append_pair("thumbsize", &lead_image_width.to_string());
    Ok(url)
}

fn remaining_url(title: &PageTitle) -> Result<Url, FetchError> {
    endpoint(title, "mobile-sections-remaining")
}

fn endpoint(title: &PageTitle, name: &str) -> Result<Url, FetchError> {
    let base = title.site().base_url();
    let mut url = Url::parse(&base).map_err(|_| FetchError::InvalidUrl(base.clone()))?;

    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl(base.clone()))?
        .pop_if_empty()
        .extend(["api", "rest_v1", "page", name])
        // push() percent-encodes, so "AC/DC" stays one segment
        .push(title.prefixed_text());

    Ok(url)
}

// Error and 304 bodies are read out too so the connection can be reused
async fn release(response: HttpResponse) {
    let url = response.url().to_string();
    if let Err(e) = response.drain().await {
        debug!(%url, error = %e, "could not drain response body");
    }
}

fn payload_markup(url: &str, body: &str, lead_image_width: Option<u32>) -> Result<String, FetchError> {
    let payload: SectionsPayload = serde_json::from_str(body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let mut parts = Vec::with_capacity(payload.sections.len() + 1);

    if let (Some(image), Some(width)) = (&payload.image, lead_image_width) {
        if let Some(src) = pick_lead_image(&image.urls, width) {
            parts.push(format!(r#"<img src="{}">"#, escape_attr(src)));
        }
    }

    parts.extend(
        payload
            .sections
            .into_iter()
            .map(|s| s.text)
            .filter(|t| !t.trim().is_empty()),
    );

    Ok(parts.join("\n"))
}

/// Chooses the lead image rendition for a requested width: the exact width,
/// else the widest one not wider than requested, else the narrowest offered.
/// Keys that are not widths are ignored.
fn pick_lead_image(urls: &BTreeMap<String, String>, width: u32) -> Option<&str> {
    let mut sized: Vec<(u32, &str)> = urls
        .iter()
        .filter_map(|(key, src)| Some((key.trim().parse::<u32>().ok()?, src.as_str())))
        .collect();
    sized.sort_by_key(|(w, _)| *w);

    sized
        .iter()
        .rev()
        .find(|(w, _)| *w <= width)
        .or_else(|| sized.first())
        .map(|(_, src)| *src)
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
