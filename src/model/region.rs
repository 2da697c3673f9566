//! Annotation regions as supplied by the host.
//!
//! The host sends a JSON array of records shaped like
//! `{"bbox": [x1, y1, x2, y2] | null, "color": [r, g, b], "page": 1}`.
//! Coordinates are in a normalized 0-100 space relative to the surface.

use serde::{Deserialize, Serialize};

/// 1-based page number.
///
/// Deserialized leniently: a page of `0` is accepted but never matches a
/// rendered page, so the region is dropped like any other unknown page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageIndex(u32);

impl PageIndex {
    pub const FIRST: PageIndex = PageIndex(1);

    /// Create a page index; `None` for 0.
    pub fn new(page: u32) -> Option<Self> {
        (page >= 1).then_some(Self(page))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based position of this page in a page list.
    pub fn to_zero_based(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }

    /// Page index for a zero-based list position.
    pub fn from_zero_based(index: usize) -> Self {
        Self(index as u32 + 1)
    }
}

impl Default for PageIndex {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for PageIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized box `(x1, y1, x2, y2)`, each 0-100.
///
/// `x1 <= x2` and `y1 <= y2` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Normalized width (`x2 - x1`), negative for an inverted box.
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Normalized height (`y2 - y1`), negative for an inverted box.
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// Highlight color as sent by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(v: [u8; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl From<Rgb> for hlview_canvas::Color {
    fn from(c: Rgb) -> Self {
        hlview_canvas::Color::rgb(c.r, c.g, c.b)
    }
}

/// One highlight region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRegion {
    /// Box in normalized space; `None` means "nothing to draw".
    #[serde(default)]
    pub bbox: Option<BBox>,
    pub color: Rgb,
    /// Target page. Ignored by the single-surface image viewer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageIndex>,
}

impl AnnotationRegion {
    /// Region for the single-surface image viewer.
    pub fn new(bbox: BBox, color: Rgb) -> Self {
        Self {
            bbox: Some(bbox),
            color,
            page: None,
        }
    }

    /// Region bound to a page.
    pub fn on_page(mut self, page: PageIndex) -> Self {
        self.page = Some(page);
        self
    }

    /// Region without a box (skipped at draw time).
    pub fn without_bbox(color: Rgb) -> Self {
        Self {
            bbox: None,
            color,
            page: None,
        }
    }

    /// Whether the region belongs to `page`.
    pub fn is_on_page(&self, page: PageIndex) -> bool {
        self.page == Some(page)
    }
}
