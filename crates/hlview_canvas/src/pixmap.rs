//! CPU raster backend built on tiny-skia.

use std::path::Path;

use tiny_skia::{
    ColorU8, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::{Color, DrawSurface, PixelRect, RasterImage, SurfaceError, SurfaceFactory};

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.alpha_u8());
    paint.anti_alias = true;
    paint
}

fn to_skia_rect(rect: PixelRect) -> Option<Rect> {
    let r = rect.normalized();
    Rect::from_xywh(r.x, r.y, r.width, r.height)
}

/// A surface backed by a tiny-skia pixmap (premultiplied RGBA8).
pub struct PixmapSurface {
    pixmap: Pixmap,
}

impl PixmapSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::ZeroSize { width, height })?;
        Ok(Self { pixmap })
    }

    /// Fill the whole surface.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(tiny_skia::Color::from_rgba8(
            color.r,
            color.g,
            color.b,
            color.alpha_u8(),
        ));
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Read one pixel as straight (non-premultiplied) RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Encode the surface as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.pixmap
            .encode_png()
            .map_err(|e| SurfaceError::Backend(format!("PNG encoding failed: {}", e)))
    }

    /// Write the surface to a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        let path = path.as_ref();
        self.pixmap
            .save_png(path)
            .map_err(|e| SurfaceError::Backend(format!("Failed to write {:?}: {}", path, e)))?;
        log::debug!(
            "Saved {}x{} surface to {:?}",
            self.pixmap.width(),
            self.pixmap.height(),
            path
        );
        Ok(())
    }
}

impl DrawSurface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let Some(r) = to_skia_rect(rect) else {
            log::trace!("Skipping degenerate fill {:?}", rect);
            return;
        };
        self.pixmap
            .fill_rect(r, &paint_for(color), Transform::identity(), None);
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Color, line_width: f32) {
        let Some(r) = to_skia_rect(rect) else {
            log::trace!("Skipping degenerate stroke {:?}", rect);
            return;
        };
        let path = PathBuilder::from_rect(r);
        let stroke = Stroke {
            width: line_width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint_for(color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    fn draw_image(&mut self, image: &RasterImage, dest: PixelRect) {
        let Some(mut src) = Pixmap::new(image.width(), image.height()) else {
            log::warn!(
                "Could not allocate {}x{} raster",
                image.width(),
                image.height()
            );
            return;
        };
        for (dst, px) in src
            .pixels_mut()
            .iter_mut()
            .zip(image.rgba().chunks_exact(4))
        {
            *dst = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
        }

        let dest = dest.normalized();
        let sx = dest.width / image.width() as f32;
        let sy = dest.height / image.height() as f32;
        let transform = Transform::from_row(sx, 0.0, 0.0, sy, dest.x, dest.y);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
    }
}

/// Factory for [`PixmapSurface`], optionally pre-filled with a background.
#[derive(Debug, Clone, Default)]
pub struct PixmapFactory {
    background: Option<Color>,
}

impl PixmapFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill every new surface with this color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

impl SurfaceFactory for PixmapFactory {
    type Surface = PixmapSurface;

    fn create_surface(&mut self, width: u32, height: u32) -> Result<PixmapSurface, SurfaceError> {
        let mut surface = PixmapSurface::new(width, height)?;
        if let Some(bg) = self.background {
            surface.clear(bg);
        }
        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            PixmapSurface::new(0, 10),
            Err(SurfaceError::ZeroSize {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn test_fill_rect_translucent() {
        let mut s = PixmapFactory::new()
            .with_background(Color::WHITE)
            .create_surface(20, 20)
            .unwrap();
        s.fill_rect(
            PixelRect::new(5.0, 5.0, 10.0, 10.0),
            Color::rgb(255, 0, 0).with_alpha(0.5),
        );

        let inside = s.pixel(10, 10).unwrap();
        assert_eq!(inside[0], 255);
        assert!(inside[1] > 100 && inside[1] < 150);
        assert_eq!(s.pixel(1, 1).unwrap(), [255, 255, 255, 255]);
    }

    #[test]
    fn test_inverted_rect_is_drawn() {
        let mut s = PixmapSurface::new(20, 20).unwrap();
        s.fill_rect(PixelRect::new(15.0, 15.0, -10.0, -10.0), Color::BLACK);
        assert_eq!(s.pixel(10, 10).unwrap()[3], 255);
        assert_eq!(s.pixel(18, 18).unwrap()[3], 0);
    }

    #[test]
    fn test_stroke_leaves_interior_empty() {
        let mut s = PixmapSurface::new(40, 40).unwrap();
        s.stroke_rect(PixelRect::new(5.0, 5.0, 30.0, 30.0), Color::BLACK, 2.0);
        assert!(s.pixel(5, 20).unwrap()[3] > 0);
        assert_eq!(s.pixel(20, 20).unwrap()[3], 0);
    }

    #[test]
    fn test_draw_image_scaled() {
        let mut s = PixmapSurface::new(10, 10).unwrap();
        let img = RasterImage::solid(2, 2, Color::rgb(0, 0, 255));
        s.draw_image(&img, PixelRect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(s.pixel(5, 5).unwrap(), [0, 0, 255, 255]);
    }

    #[test]
    fn test_draw_translucent_image_keeps_straight_color() {
        let mut s = PixmapSurface::new(4, 4).unwrap();
        let img = RasterImage::solid(4, 4, Color::rgb(200, 100, 0).with_alpha(0.5));
        s.draw_image(&img, PixelRect::new(0.0, 0.0, 4.0, 4.0));
        let [r, g, b, a] = s.pixel(2, 2).unwrap();
        assert!((127..=128).contains(&a));
        assert!(r.abs_diff(200) <= 2 && g.abs_diff(100) <= 2 && b == 0);
    }

    #[test]
    fn test_encode_png_signature() {
        let s = PixmapSurface::new(4, 4).unwrap();
        let png = s.encode_png().unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }
}
