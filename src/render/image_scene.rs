//! The image viewer: one raster fitted into a container, outlined highlights
//! on top, pan and zoom applied at composition time.

use hlview_canvas::{Color, DrawSurface, PixelRect, RasterImage, SurfaceFactory};

use super::RenderOutcome;
use crate::config::ImageViewerConfig;
use crate::error::{DecodeError, RenderError};
use crate::model::{AnnotationRegion, FitPlacement, SurfaceGeometry, fit_within};
use crate::overlay::{Overlay, OverlayBuilder};
use crate::zoom_math::ImageViewport;

/// Decode image bytes (PNG, JPEG, WebP, ...) into RGBA pixels.
pub fn decode_image(bytes: &[u8]) -> Result<RasterImage, RenderError> {
    let img = ::image::load_from_memory(bytes)
        .map_err(DecodeError::from)?
        .to_rgba8();
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage.into());
    }
    log::trace!("Decoded {}x{} image", width, height);
    Ok(RasterImage::from_rgba8(img.into_raw(), width, height)?)
}

/// A decoded image with its fitted placement and overlay.
#[derive(Debug, Clone)]
pub struct ImageScene {
    image: RasterImage,
    placement: FitPlacement,
    overlay: Overlay,
}

impl ImageScene {
    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn placement(&self) -> FitPlacement {
        self.placement
    }

    /// Highlights in fitted-image space.
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }
}

/// Image viewer state: configuration, container, viewport and current scene.
pub struct ImageViewer {
    config: ImageViewerConfig,
    container: SurfaceGeometry,
    viewport: ImageViewport,
    builder: OverlayBuilder,
    background: Option<Color>,
    scene: Option<ImageScene>,
    /// Regions of the current inputs, kept for refitting on resize
    regions: Vec<AnnotationRegion>,
}

impl ImageViewer {
    /// Viewer with the configured default container size.
    pub fn new(config: ImageViewerConfig) -> Self {
        let container = config.default_container_geometry();
        Self::with_container(config, container)
    }

    pub fn with_container(config: ImageViewerConfig, container: SurfaceGeometry) -> Self {
        let viewport = ImageViewport::new(container, config.zoom_factor, config.zoom_limits);
        let builder = OverlayBuilder::image(config.stroke_width).with_axis(config.y_axis);
        Self {
            config,
            container,
            viewport,
            builder,
            background: None,
            scene: None,
            regions: Vec::new(),
        }
    }

    /// Fill composed surfaces with a background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn config(&self) -> &ImageViewerConfig {
        &self.config
    }

    pub fn container(&self) -> SurfaceGeometry {
        self.container
    }

    pub fn viewport(&self) -> &ImageViewport {
        &self.viewport
    }

    pub fn scene(&self) -> Option<&ImageScene> {
        self.scene.as_ref()
    }

    /// Replace the document and regions, rebuilding the scene from scratch.
    ///
    /// `None` or empty bytes clear the scene. The zoom is kept; the image
    /// group is re-centered in the container.
    pub fn set_inputs(
        &mut self,
        document: Option<&[u8]>,
        regions: &[AnnotationRegion],
    ) -> Result<RenderOutcome, RenderError> {
        self.regions = regions.to_vec();

        let Some(bytes) = document.filter(|b| !b.is_empty()) else {
            log::debug!("No image document, clearing scene");
            self.scene = None;
            return Ok(RenderOutcome::NoDocument);
        };

        let image = match decode_image(bytes) {
            Ok(image) => image,
            Err(e) => {
                self.scene = None;
                log::error!("Image decode failed: {}", e);
                return Err(e);
            }
        };

        self.rebuild(image);
        Ok(RenderOutcome::Complete { pages: 1 })
    }

    /// Decode a base64 document and replace the inputs.
    pub fn set_inputs_base64(
        &mut self,
        base64: &str,
        regions: &[AnnotationRegion],
    ) -> Result<RenderOutcome, RenderError> {
        let bytes = crate::source::decode_document(base64)?;
        self.set_inputs(bytes.as_deref(), regions)
    }

    fn rebuild(&mut self, image: RasterImage) {
        let intrinsic = SurfaceGeometry::from_pixels(image.width(), image.height());
        let placement = fit_within(intrinsic, self.container);
        let overlay = self.builder.build(&self.regions, placement.geometry);
        self.viewport
            .set_group_offset(placement.offset.0, placement.offset.1);

        log::debug!(
            "Image scene {}x{} fitted to {:.1}x{:.1} at ({:.1}, {:.1}), {} highlights",
            image.width(),
            image.height(),
            placement.geometry.width,
            placement.geometry.height,
            placement.offset.0,
            placement.offset.1,
            overlay.len()
        );

        self.scene = Some(ImageScene {
            image,
            placement,
            overlay,
        });
    }

    /// Change the container size and refit the current scene.
    pub fn resize(&mut self, container: SurfaceGeometry) {
        self.container = container;
        self.viewport.resize(container);
        if let Some(scene) = self.scene.take() {
            self.rebuild(scene.image);
        }
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.viewport.zoom_out()
    }

    pub fn zoom_percent(&self) -> u32 {
        self.viewport.zoom_percent()
    }

    /// Drag the image and its highlights by a screen-space delta.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.viewport.pan_by(dx, dy);
    }

    /// Draw the current scene onto a new container-sized surface.
    pub fn compose<F: SurfaceFactory>(&self, factory: &mut F) -> Result<F::Surface, RenderError> {
        let (width, height) = self.container.to_pixels();
        let mut surface = factory.create_surface(width, height)?;
        self.draw_onto(&mut surface);
        Ok(surface)
    }

    /// Draw the current scene onto an existing surface.
    pub fn draw_onto<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        if let Some(bg) = self.background {
            let (w, h) = (surface.width() as f32, surface.height() as f32);
            surface.fill_rect(PixelRect::new(0.0, 0.0, w, h), bg);
        }
        let Some(scene) = &self.scene else {
            return;
        };
        let transform = self.viewport.scene_transform();
        let g = scene.placement.geometry;
        surface.draw_image(
            &scene.image,
            transform.apply_rect(PixelRect::new(0.0, 0.0, g.width, g.height)),
        );
        scene.overlay.draw(surface, transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Rgb};
    use hlview_canvas::{DrawCommand, RecordingFactory};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = ::image::RgbaImage::from_pixel(width, height, ::image::Rgba([10, 20, 30, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ::image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn viewer() -> ImageViewer {
        ImageViewer::with_container(
            ImageViewerConfig::default(),
            SurfaceGeometry::new(400.0, 400.0),
        )
    }

    #[test]
    fn test_no_document() {
        let mut v = viewer();
        assert!(matches!(
            v.set_inputs(None, &[]).unwrap(),
            RenderOutcome::NoDocument
        ));
        assert!(matches!(
            v.set_inputs(Some(&[][..]), &[]).unwrap(),
            RenderOutcome::NoDocument
        ));
        let surface = v.compose(&mut RecordingFactory::new()).unwrap();
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_malformed_image_is_decode_error() {
        let mut v = viewer();
        let err = v.set_inputs(Some(&b"definitely not an image"[..]), &[]).unwrap_err();
        assert!(matches!(err, RenderError::Decode(DecodeError::Image(_))));
        assert!(v.scene().is_none());
    }

    #[test]
    fn test_scene_fitted_and_centered() {
        let mut v = viewer();
        v.set_inputs(Some(png(200, 100).as_slice()), &[]).unwrap();
        let placement = v.scene().unwrap().placement();
        assert_eq!(placement.geometry, SurfaceGeometry::new(400.0, 200.0));
        assert_eq!(placement.offset, (0.0, 100.0));
        assert_eq!(v.viewport().group_offset(), (0.0, 100.0));
    }

    #[test]
    fn test_compose_draws_image_then_strokes() {
        let mut v = viewer();
        let regions = vec![
            AnnotationRegion::new(BBox::new(0.0, 0.0, 50.0, 50.0), Rgb::new(255, 0, 0)),
            AnnotationRegion::without_bbox(Rgb::new(0, 255, 0)),
            AnnotationRegion::new(BBox::new(50.0, 50.0, 100.0, 100.0), Rgb::new(0, 0, 255)),
        ];
        v.set_inputs(Some(png(100, 100).as_slice()), &regions).unwrap();

        let surface = v.compose(&mut RecordingFactory::new()).unwrap();
        let cmds = surface.commands();
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[0], DrawCommand::DrawImage { source: (100, 100), .. }));
        match &cmds[2] {
            DrawCommand::StrokeRect { rect, color, width } => {
                assert_eq!(*rect, PixelRect::new(200.0, 200.0, 200.0, 200.0));
                assert_eq!(color.to_css(), "rgb(0, 0, 255)");
                assert_eq!(*width, 2.0);
            }
            other => panic!("expected stroke, got {:?}", other),
        }
    }

    #[test]
    fn test_zoom_keeps_center_highlight_fixed() {
        let mut v = viewer();
        // Box centered on the image, image fills the square container
        let regions = vec![AnnotationRegion::new(
            BBox::new(45.0, 45.0, 55.0, 55.0),
            Rgb::new(1, 1, 1),
        )];
        v.set_inputs(Some(png(50, 50).as_slice()), &regions).unwrap();

        let center_of = |v: &ImageViewer| {
            let surface = v.compose(&mut RecordingFactory::new()).unwrap();
            match surface.rect_commands().next() {
                Some(DrawCommand::StrokeRect { rect, .. }) => {
                    (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
                }
                other => panic!("expected stroke, got {:?}", other),
            }
        };

        let before = center_of(&v);
        v.zoom_in();
        v.zoom_in();
        let zoomed = center_of(&v);
        assert!((before.0 - zoomed.0).abs() < 0.001);
        assert!((before.1 - zoomed.1).abs() < 0.001);
        assert_eq!(v.zoom_percent(), 144);
    }

    #[test]
    fn test_resize_refits() {
        let mut v = viewer();
        v.set_inputs(Some(png(100, 100).as_slice()), &[]).unwrap();
        v.resize(SurfaceGeometry::new(800.0, 400.0));
        let placement = v.scene().unwrap().placement();
        assert_eq!(placement.geometry, SurfaceGeometry::new(400.0, 400.0));
        assert_eq!(placement.offset, (200.0, 0.0));
    }

    #[test]
    fn test_base64_input() {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(png(4, 4));
        let mut v = viewer();
        let outcome = v.set_inputs_base64(&encoded, &[]).unwrap();
        assert!(outcome.is_complete());
        assert!(v.set_inputs_base64("", &[]).unwrap().rendered() == 0);
    }
}
