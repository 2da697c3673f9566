//! End-to-end rendering onto tiny-skia surfaces.

use base64::Engine;
use hlview_canvas::{Color, PixmapFactory, PixmapSurface, RasterImage};

use super::{ImageViewer, PageError, PdfBackend, PdfDocumentSource, PdfViewer, RenderOutcome};
use crate::config::{ImageViewerConfig, PdfViewerConfig};
use crate::error::DecodeError;
use crate::model::{PageIndex, SurfaceGeometry};
use crate::source::parse_regions;

fn blue_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 255, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn data_url(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

#[test]
fn test_image_highlight_outlines_word_box() {
    let regions = parse_regions(
        r#"[
            {"bbox": [10, 10, 50, 50], "color": [255, 0, 0]},
            {"bbox": null, "color": [0, 255, 0]}
        ]"#,
    )
    .unwrap();

    let mut viewer = ImageViewer::with_container(
        ImageViewerConfig::default(),
        SurfaceGeometry::new(100.0, 100.0),
    );
    let outcome = viewer
        .set_inputs_base64(&data_url(&blue_png(100, 100)), &regions)
        .unwrap();
    assert!(outcome.is_complete());
    assert_eq!(viewer.scene().unwrap().overlay().len(), 1);

    let surface = viewer.compose(&mut PixmapFactory::new()).unwrap();
    // Left edge of the box at x=10, stroke 2px wide centered on it
    let edge = surface.pixel(10, 30).unwrap();
    assert!(edge[0] > 200 && edge[2] < 60, "edge pixel {:?}", edge);
    // Inside the box the image shows through
    assert_eq!(surface.pixel(30, 30).unwrap(), [0, 0, 255, 255]);
    // The absent-bbox region drew nothing green anywhere on the edge row
    assert!((0..100).all(|x| surface.pixel(x, 30).unwrap()[1] < 10));
}

#[test]
fn test_image_zoom_round_trip_restores_composition() {
    let regions = parse_regions(r#"[{"bbox": [20, 20, 80, 80], "color": [0, 0, 0]}]"#).unwrap();
    let mut viewer = ImageViewer::with_container(
        ImageViewerConfig::default(),
        SurfaceGeometry::new(120.0, 80.0),
    )
    .with_background(Color::CANVAS_GRAY);
    viewer
        .set_inputs(Some(blue_png(60, 40).as_slice()), &regions)
        .unwrap();

    let before = viewer.compose(&mut PixmapFactory::new()).unwrap();
    viewer.zoom_in();
    viewer.zoom_in();
    viewer.zoom_out();
    viewer.zoom_out();
    assert_eq!(viewer.zoom_percent(), 100);
    let after = viewer.compose(&mut PixmapFactory::new()).unwrap();
    // Float round-off may nudge antialiased edges by a level
    let max_diff = before
        .pixmap()
        .data()
        .iter()
        .zip(after.pixmap().data())
        .map(|(a, b)| a.abs_diff(*b))
        .max()
        .unwrap();
    assert!(max_diff <= 2, "max channel difference {}", max_diff);
}

/// Backend that produces blank white pages of fixed point sizes.
struct BlankPages {
    sizes: Vec<(f32, f32)>,
}

struct BlankDocument<'a> {
    sizes: &'a [(f32, f32)],
}

impl PdfDocumentSource for BlankDocument<'_> {
    fn page_count(&self) -> usize {
        self.sizes.len()
    }

    fn page_size(&self, page: PageIndex) -> Result<SurfaceGeometry, PageError> {
        page.to_zero_based()
            .and_then(|i| self.sizes.get(i))
            .map(|&(w, h)| SurfaceGeometry::new(w, h))
            .ok_or_else(|| PageError::Raster(format!("no page {}", page)))
    }

    async fn render_page(&self, page: PageIndex, scale: f32) -> Result<RasterImage, PageError> {
        let (w, h) = self.page_size(page)?.scaled(scale).to_pixels();
        Ok(RasterImage::solid(w, h, Color::WHITE))
    }
}

impl PdfBackend for BlankPages {
    type Document<'a> = BlankDocument<'a>;

    async fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<BlankDocument<'a>, DecodeError> {
        if bytes.starts_with(b"%PDF") {
            Ok(BlankDocument { sizes: &self.sizes })
        } else {
            Err(DecodeError::pdf("not a PDF"))
        }
    }
}

#[test]
fn test_pdf_highlights_land_on_their_page_with_y_flip() {
    let backend = BlankPages {
        sizes: vec![(100.0, 100.0), (100.0, 100.0)],
    };
    let regions = parse_regions(
        r#"[
            {"bbox": [0, 0, 50, 50], "color": [255, 255, 0], "page": 2},
            {"bbox": [0, 0, 10, 10], "color": [255, 0, 0], "page": 7}
        ]"#,
    )
    .unwrap();

    let mut viewer: PdfViewer<PixmapSurface> = PdfViewer::new(PdfViewerConfig::default());
    let pass = viewer.begin_pass(&regions);
    let outcome = pollster::block_on(pass.run(
        Some(&b"%PDF-1.4"[..]),
        &backend,
        &mut PixmapFactory::new(),
    ))
    .unwrap();
    assert!(matches!(outcome, RenderOutcome::Complete { pages: 2 }));

    let pages = viewer.pages();
    let first = &pages.pages()[0].surface;
    let second = &pages.pages()[1].surface;
    assert_eq!(first.pixmap().width(), 150);

    // Page 1 has no highlights
    assert_eq!(first.pixel(10, 140).unwrap(), [255, 255, 255, 255]);

    // Bottom-left quarter of page 2 is tinted yellow at half opacity
    let tinted = second.pixel(10, 140).unwrap();
    assert!(tinted[0] >= 250 && tinted[1] >= 250, "tinted pixel {:?}", tinted);
    assert!((120..=135).contains(&tinted[2]), "tinted pixel {:?}", tinted);
    assert_eq!(second.pixel(140, 10).unwrap(), [255, 255, 255, 255]);
}

#[test]
fn test_pdf_bad_document_is_decode_error() {
    let backend = BlankPages { sizes: vec![] };
    let mut viewer: PdfViewer<PixmapSurface> = PdfViewer::new(PdfViewerConfig::default());
    let pass = viewer.begin_pass(&[]);
    let err = pollster::block_on(pass.run(
        Some(&b"<html>"[..]),
        &backend,
        &mut PixmapFactory::new(),
    ))
    .unwrap_err();
    assert!(err.to_string().contains("not a PDF"));
    assert_eq!(viewer.page_count(), 0);
}
