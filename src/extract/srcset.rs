// src/extract/srcset.rs
// =============================================================================
// Parses the `srcset` attribute of an <img> tag.
//
// A srcset lists alternative renderings of the same image:
//
//   srcset="//upload.wikimedia.org/a/330px-Cat.jpg 1.5x,
//           //upload.wikimedia.org/a/440px-Cat.jpg 2x"
//
// Each candidate is a URL optionally followed by a pixel density ("2x") or
// a width ("440w"). High-density screens will ask for these variants, so
// they are worth prefetching too.
// =============================================================================

/// What follows the URL in a srcset candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Descriptor {
    /// Pixel density, e.g. `1.5x`
    Density(f32),
    /// Intrinsic width in pixels, e.g. `440w`
    Width(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SrcsetCandidate {
    pub url: String,
    /// None means the implicit `1x`
    pub descriptor: Option<Descriptor>,
}

/// Parses a srcset value into its candidates.
///
/// Malformed candidates are skipped rather than failing the whole
/// attribute: one bad entry should not hide the good ones.
pub fn parse_srcset(srcset: &str) -> Vec<SrcsetCandidate> {
    srcset.split(',').filter_map(parse_candidate).collect()
}

fn parse_candidate(raw: &str) -> Option<SrcsetCandidate> {
    let mut parts = raw.split_whitespace();

    let url = parts.next()?;
    let descriptor = match parts.next() {
        Some(d) => Some(parse_descriptor(d)?),
        None => None,
    };

    // "url 2x 3x" is not a valid candidate
    if parts.next().is_some() {
        return None;
    }

    Some(SrcsetCandidate {
        url: url.to_string(),
        descriptor,
    })
}

fn parse_descriptor(raw: &str) -> Option<Descriptor> {
    if let Some(density) = raw.strip_suffix('x') {
        let value: f32 = density.parse().ok()?;
        if value.is_finite() && value > 0.0 {
            return Some(Descriptor::Density(value));
        }
        return None;
    }

    if let Some(width) = raw.strip_suffix('w') {
        let value: u32 = width.parse().ok()?;
        if value > 0 {
            return Some(Descriptor::Width(value));
        }
    }

    None
}
