//! hlview_canvas - drawable surfaces for highlight overlays
//!
//! This crate provides the small drawing capability the viewers need:
//! create a surface of a given size, fill or stroke a rectangle, and draw a
//! raster image. Backends implement [`DrawSurface`] and [`SurfaceFactory`].

mod color;
mod geometry;
mod pixmap;
mod recording;
mod surface;

pub use color::Color;
pub use geometry::{PixelRect, SceneTransform};
pub use pixmap::{PixmapFactory, PixmapSurface};
pub use recording::{DrawCommand, RecordingFactory, RecordingSurface};
pub use surface::{DrawSurface, RasterImage, SurfaceError, SurfaceFactory};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Color, DrawSurface, PixelRect, RasterImage, SceneTransform, SurfaceError, SurfaceFactory,
    };
}
