//! Node/arc coloring, with an optional remote palette.
//!
//! The palette fetch is best-effort and fire-and-forget: one attempt with a
//! short timeout at startup, no retry. Any failure falls back to the flat
//! built-in colors.

use crossterm::style::Color;
use serde::Deserialize;
use std::time::Duration;

const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Flat fallback colors, used whenever no palette is available.
const FLAT_NODE: Color = Color::Cyan;
const FLAT_LONG_ARC: Color = Color::Magenta;
const FLAT_SATELLITE: Color = Color::Yellow;

/// Remote palette file: RGB triples per entity class.
#[derive(Debug, Deserialize)]
pub struct Palette {
    pub node: [u8; 3],
    pub long_arc: [u8; 3],
    pub satellite: [u8; 3],
}

/// Resolved colors for the scene's highlight layers. Short links and stars
/// follow the active color scheme instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub node: Color,
    pub long_arc: Color,
    pub satellite: Color,
}

impl Material {
    /// The flat procedural colors.
    pub fn flat() -> Self {
        Self {
            node: FLAT_NODE,
            long_arc: FLAT_LONG_ARC,
            satellite: FLAT_SATELLITE,
        }
    }

    /// Apply a fetched palette, or fall back flat when the fetch failed.
    pub fn resolve(palette: Option<Palette>) -> Self {
        match palette {
            Some(p) => Self {
                node: rgb(p.node),
                long_arc: rgb(p.long_arc),
                satellite: rgb(p.satellite),
            },
            None => Self::flat(),
        }
    }

    /// Fetch a palette from `url` and resolve it. `None` skips the fetch.
    pub fn load(url: Option<&str>) -> Self {
        Self::resolve(url.and_then(fetch_palette))
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

/// Single palette fetch attempt. Returns None on any transport or parse
/// failure; the caller substitutes the flat colors.
fn fetch_palette(url: &str) -> Option<Palette> {
    ureq::get(url)
        .timeout(FETCH_TIMEOUT)
        .call()
        .ok()?
        .into_json::<Palette>()
        .ok()
}
