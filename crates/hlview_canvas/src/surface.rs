//! The drawable surface capability shared by all backends.

use crate::{Color, PixelRect};

/// Errors raised by surface backends.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// A surface cannot have a zero dimension
    #[error("Cannot create a {width}x{height} surface")]
    ZeroSize { width: u32, height: u32 },

    /// The backend could not hand out a drawing context
    #[error("Drawing context unavailable: {0}")]
    ContextUnavailable(String),

    /// Pixel buffer does not match the declared dimensions
    #[error("Invalid raster: expected {expected} bytes, got {actual}")]
    InvalidRaster { expected: usize, actual: usize },

    /// Any other backend failure (encoding, I/O)
    #[error("Surface backend error: {0}")]
    Backend(String),
}

/// Decoded RGBA8 pixels (straight alpha), ready to be drawn onto a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA8 buffer, checking that its length matches `width * height * 4`.
    pub fn from_rgba8(rgba: Vec<u8>, width: u32, height: u32) -> Result<Self, SurfaceError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(SurfaceError::InvalidRaster {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// A raster filled with one color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let px = [color.r, color.g, color.b, color.alpha_u8()];
        let rgba = px
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }
}

/// Something highlights can be drawn onto.
///
/// Drawing operations never fail: a degenerate rectangle is simply not
/// rasterized. Only surface creation can fail (see [`SurfaceFactory`]).
pub trait DrawSurface {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Fill a rectangle with a (possibly translucent) color.
    fn fill_rect(&mut self, rect: PixelRect, color: Color);

    /// Outline a rectangle, centered on its edges.
    fn stroke_rect(&mut self, rect: PixelRect, color: Color, line_width: f32);

    /// Draw a raster image scaled into `dest`.
    fn draw_image(&mut self, image: &RasterImage, dest: PixelRect);
}

/// Creates surfaces; acquiring a drawing context is the step that can fail.
pub trait SurfaceFactory {
    type Surface: DrawSurface;

    fn create_surface(&mut self, width: u32, height: u32) -> Result<Self::Surface, SurfaceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_length_checked() {
        let err = RasterImage::from_rgba8(vec![0; 15], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::InvalidRaster {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn test_solid_raster() {
        let img = RasterImage::solid(3, 2, Color::rgb(9, 8, 7));
        assert_eq!(img.rgba().len(), 24);
        assert_eq!(&img.rgba()[20..24], &[9, 8, 7, 255]);
    }
}
