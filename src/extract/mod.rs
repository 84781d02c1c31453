// src/extract/mod.rs
// =============================================================================
// Image reference extraction from page markup.
//
// Submodules:
// - image: walks the <img> tags of a document
// - srcset: parses pixel-density / width variants
//
// Everything here is a pure function: no state, no I/O, no errors.
// =============================================================================

mod image;
mod srcset;

pub use image::extract_image_urls;
pub use srcset::{parse_srcset, Descriptor, SrcsetCandidate};
