// src/extract/image.rs
// =============================================================================
// This module extracts image references from page markup.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Never fails on bad input: html5ever repairs whatever it is given
//
// For every <img> we collect:
// - src       (the default rendering)
// - data-src  (lazy-loaded images keep the real URL here)
// - srcset    (every pixel-density / width variant)
//
// URLs are returned exactly as written in the markup (they may still be
// protocol-relative); resolving them is the dispatcher's job.
// =============================================================================

use super::srcset::parse_srcset;
use scraper::{Html, Selector};
use std::collections::HashSet;

// Attributes holding a single image URL
const SINGLE_URL_ATTRS: [&str; 2] = ["src", "data-src"];

/// Extracts every image URL referenced by the markup, deduplicated.
///
/// Empty or malformed markup gives back whatever could be found, possibly
/// nothing. This function never panics and has no error case.
///
/// Example:
///   markup = `<img src="//up.org/a.png" srcset="//up.org/b.png 2x">`
///   result = {"//up.org/a.png", "//up.org/b.png"}
pub fn extract_image_urls(markup: &str) -> HashSet<String> {
    let mut urls = HashSet::new();

    if markup.trim().is_empty() {
        return urls;
    }

    let Ok(selector) = Selector::parse("img") else {
        return urls;
    };

    let document = Html::parse_document(markup);

    for element in document.select(&selector) {
        let img = element.value();

        for attr in SINGLE_URL_ATTRS {
            if let Some(url) = img.attr(attr) {
                insert_if_fetchable(&mut urls, url);
            }
        }

        if let Some(srcset) = img.attr("srcset") {
            for candidate in parse_srcset(srcset) {
                insert_if_fetchable(&mut urls, &candidate.url);
            }
        }
    }

    urls
}

fn insert_if_fetchable(urls: &mut HashSet<String>, url: &str) {
    let url = url.trim();
    if is_fetchable(url) {
        urls.insert(url.to_string());
    }
}

// Inline data: URIs carry their bytes with them, nothing to prefetch
fn is_fetchable(url: &str) -> bool {
    !url.is_empty() && !url.to_ascii_lowercase().starts_with("data:")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is let-else?
//    - let Ok(selector) = ... else { return urls; };
//    - Binds on success, otherwise runs the else block, which must exit
//    - Here it replaces an unwrap() on a selector we know is valid
//
// 2. Why HashSet<String>?
//    - The same image often appears several times on a page
//    - A set keeps one copy of each URL, no extra dedup pass needed
// -----------------------------------------------------------------------------
