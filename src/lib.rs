//! hlview - highlight overlay viewers for images and PDFs
//!
//! Draws colored rectangles over a rendered document. Annotation regions come
//! in a normalized 0-100 coordinate space and are mapped onto each rendered
//! surface: one fitted surface for an image (pan and zoom), one surface per
//! page for a PDF (discrete zoom, current-page tracking).

pub mod config;
pub mod constants;
pub mod coords;
pub mod error;
pub mod model;
pub mod overlay;
pub mod pdf_viewport;
pub mod render;
pub mod source;
pub mod zoom_math;

pub use hlview_canvas;

pub use config::{ConfigError, ImageViewerConfig, LogLevel, PdfViewerConfig, ViewerConfig};
pub use coords::{YAxis, map_bbox, map_region};
pub use error::{DecodeError, RegionParseError, RenderError};
pub use model::{AnnotationRegion, BBox, PageIndex, Rgb, SurfaceGeometry};
pub use overlay::{Overlay, OverlayBuilder};
pub use pdf_viewport::{PdfEvent, PdfViewport};
pub use render::{ImageViewer, PdfBackend, PdfDocumentSource, PdfViewer, RenderOutcome};
pub use source::{decode_document, parse_regions};
pub use zoom_math::ImageViewport;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
