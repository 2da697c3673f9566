//! PDF backend on top of Pdfium.
//!
//! Needs a Pdfium shared library at runtime, looked up next to the
//! executable first and then on the system library path.

use hlview_canvas::RasterImage;
use pdfium_render::prelude::*;

use super::pdf::{PdfBackend, PdfDocumentSource};
use super::PageError;
use crate::error::DecodeError;
use crate::model::{PageIndex, SurfaceGeometry};

/// A bound Pdfium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind to `./libpdfium` or the system library.
    pub fn new() -> Result<Self, DecodeError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| DecodeError::pdf(format!("failed to bind pdfium library: {:?}", e)))?;
        log::info!("Pdfium library bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

/// A document opened by [`PdfiumBackend`].
pub struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    fn page(&self, page: PageIndex) -> Result<PdfPage<'a>, PageError> {
        let index = page
            .to_zero_based()
            .and_then(|i| u16::try_from(i).ok())
            .ok_or_else(|| PageError::Raster(format!("page {} out of range", page)))?;
        self.document
            .pages()
            .get(index)
            .map_err(|e| PageError::Raster(format!("{:?}", e)))
    }
}

impl PdfDocumentSource for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, page: PageIndex) -> Result<SurfaceGeometry, PageError> {
        let page = self.page(page)?;
        Ok(SurfaceGeometry::new(page.width().value, page.height().value))
    }

    async fn render_page(&self, page: PageIndex, scale: f32) -> Result<RasterImage, PageError> {
        let (width, height) = self.page_size(page)?.scaled(scale).to_pixels();
        let bitmap = self
            .page(page)?
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(width as i32)
                    .set_target_height(height as i32)
                    .render_form_data(true)
                    .render_annotations(true),
            )
            .map_err(|e| PageError::Raster(format!("{:?}", e)))?;

        let rgba = bitmap.as_image().to_rgba8();
        let (w, h) = rgba.dimensions();
        Ok(RasterImage::from_rgba8(rgba.into_raw(), w, h)?)
    }
}

impl PdfBackend for PdfiumBackend {
    type Document<'a> = PdfiumDocument<'a>;

    async fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<PdfiumDocument<'a>, DecodeError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| DecodeError::pdf(format!("{:?}", e)))?;
        log::debug!("Loaded PDF with {} pages", document.pages().len());
        Ok(PdfiumDocument { document })
    }
}
