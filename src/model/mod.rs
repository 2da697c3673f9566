//! Data models shared by the image and PDF viewers.

mod geometry;
mod region;

pub use geometry::{FitPlacement, SurfaceGeometry, fit_within};
pub use region::{AnnotationRegion, BBox, PageIndex, Rgb};
