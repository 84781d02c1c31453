// src/page/mod.rs
// =============================================================================
// Page and site identity.
//
// Submodules:
// - site: WikiSite and URL resolution against it
// - title: PageTitle and the lead image width hint
// =============================================================================

mod site;
mod title;

pub use site::{resolve_protocol_relative_url, WikiSite};
pub use title::{lead_image_width, PageTitle};
