// src/page/site.rs
// =============================================================================
// A wiki site (scheme + host) and resolution of image URLs against it.
//
// Page markup references images in three shapes:
// - protocol-relative: //upload.wikimedia.org/foo.png
// - site-relative:     /static/images/foo.png
// - absolute:          https://upload.wikimedia.org/foo.png
//
// Every shape is turned into one absolute URL string so that two spellings
// of the same image collapse into a single fetch.
// =============================================================================

use crate::error::PageError;
use std::fmt;
use url::Url;

/// The site a page lives on, e.g. `https://en.wikipedia.org`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WikiSite {
    scheme: String,
    authority: String,
}

impl WikiSite {
    /// Parses a bare host (`en.wikipedia.org`) or a full origin
    /// (`http://localhost:8080`). Bare hosts default to https.
    pub fn parse(input: &str) -> Result<Self, PageError> {
        let trimmed = input.trim();

        // Slashes are kept: "https://" has to fail as hostless rather than
        // parse as a site whose host is "https"
        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&candidate).map_err(|_| PageError::InvalidSite(input.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(PageError::InvalidSite(input.to_string()));
        }

        // An origin only: no path, query or fragment
        let bare_origin =
            matches!(url.path(), "" | "/") && url.query().is_none() && url.fragment().is_none();
        if !bare_origin {
            return Err(PageError::InvalidSite(input.to_string()));
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| PageError::InvalidSite(input.to_string()))?;

        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            scheme: url.scheme().to_string(),
            authority,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Origin without a trailing slash: `https://en.wikipedia.org`
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.authority)
    }
}

impl fmt::Display for WikiSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

/// Turns an image reference from page markup into an absolute URL.
///
/// Never fails: input that cannot be interpreted is returned trimmed but
/// otherwise untouched, and the fetch for it fails later on its own.
pub fn resolve_protocol_relative_url(site: &WikiSite, url: &str) -> String {
    let url = url.trim();

    // "//host/path" borrows the scheme of the site we are reading
    let candidate = if url.starts_with("//") {
        format!("{}:{}", site.scheme(), url)
    } else {
        url.to_string()
    };

    if let Ok(parsed) = Url::parse(&candidate) {
        return parsed.to_string();
    }

    // Site-relative paths hang off the site origin
    if candidate.starts_with('/') {
        if let Ok(joined) = Url::parse(&site.base_url()).and_then(|base| base.join(&candidate)) {
            return joined.to_string();
        }
    }

    candidate
}
