//! The PDF viewer: one surface per page, rendered sequentially.
//!
//! A render pass walks the pages in order and awaits each before starting
//! the next. Starting a new pass clears the page stack and advances the
//! render epoch; the old pass notices at its next suspension point and stops
//! without attaching anything.

use std::cell::{Ref, RefCell};
use std::future::Future;
use std::rc::Rc;

use hlview_canvas::{DrawSurface, PixelRect, RasterImage, SceneTransform, SurfaceFactory};

use super::{
    EpochToken, PageError, PageFailure, PageStack, RenderEpoch, RenderOutcome, RenderedPage,
    SharedPageStack,
};
use crate::config::PdfViewerConfig;
use crate::error::{DecodeError, RenderError};
use crate::model::{AnnotationRegion, PageIndex, SurfaceGeometry};
use crate::overlay::OverlayBuilder;
use crate::pdf_viewport::{PdfEvent, PdfViewport};

/// A loaded PDF document that can rasterize its pages.
pub trait PdfDocumentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Page size at scale 1.0, in pixels.
    fn page_size(&self, page: PageIndex) -> Result<SurfaceGeometry, PageError>;

    /// Rasterize a page at `scale`.
    fn render_page(
        &self,
        page: PageIndex,
        scale: f32,
    ) -> impl Future<Output = Result<RasterImage, PageError>>;
}

/// Opens PDF documents from bytes.
pub trait PdfBackend {
    type Document<'a>: PdfDocumentSource
    where
        Self: 'a;

    fn load<'a>(
        &'a self,
        bytes: &'a [u8],
    ) -> impl Future<Output = Result<Self::Document<'a>, DecodeError>>;
}

/// PDF viewer state: zoom, current page, epoch and the page container.
pub struct PdfViewer<S> {
    config: PdfViewerConfig,
    viewport: PdfViewport,
    epoch: RenderEpoch,
    container: SharedPageStack<S>,
    builder: OverlayBuilder,
}

impl<S: DrawSurface> PdfViewer<S> {
    pub fn new(config: PdfViewerConfig) -> Self {
        let viewport = PdfViewport::new(config.initial_scale, config.scale_bounds())
            .with_rerender_delay(config.rerender_delay());
        let builder = OverlayBuilder::pdf(config.highlight_alpha).with_axis(config.y_axis);
        let container = Rc::new(RefCell::new(PageStack::new(config.page_spacing)));
        Self {
            config,
            viewport,
            epoch: RenderEpoch::new(),
            container,
            builder,
        }
    }

    pub fn config(&self) -> &PdfViewerConfig {
        &self.config
    }

    pub fn viewport(&self) -> &PdfViewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut PdfViewport {
        &mut self.viewport
    }

    pub fn epoch(&self) -> &RenderEpoch {
        &self.epoch
    }

    /// Borrow the page container. Do not hold the borrow across an await.
    pub fn pages(&self) -> Ref<'_, PageStack<S>> {
        self.container.borrow()
    }

    /// Page count of the last loaded document, failed pages included.
    pub fn page_count(&self) -> usize {
        self.container.borrow().page_count()
    }

    pub fn zoom_in(&mut self) -> Option<PdfEvent> {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> Option<PdfEvent> {
        self.viewport.zoom_out()
    }

    /// Update the tracked page for a new scroll offset.
    pub fn on_scroll(&mut self, scroll_offset: f32) -> Option<PdfEvent> {
        let layout = self.container.borrow().layout();
        self.viewport.on_scroll(&layout, scroll_offset)
    }

    /// Start a pass at the current scale: clears the container and supersedes
    /// any pass still in flight.
    pub fn begin_pass(&mut self, regions: &[AnnotationRegion]) -> RenderPass<S> {
        let scale = self.viewport.scale();
        self.begin_pass_at(regions, scale)
    }

    /// Start a pass at an explicit scale, e.g. one returned by
    /// [`PdfViewport::take_rerender`].
    pub fn begin_pass_at(&mut self, regions: &[AnnotationRegion], scale: f32) -> RenderPass<S> {
        let token = self.epoch.advance();
        self.container.borrow_mut().clear();
        self.viewport.mark_rendered(scale);
        log::debug!("Render pass {} at scale {:.2}", token.get(), scale);
        RenderPass {
            token,
            epoch: self.epoch.clone(),
            container: Rc::clone(&self.container),
            scale,
            regions: regions.to_vec(),
            builder: self.builder,
        }
    }
}

/// One in-flight render of a PDF into the shared page container.
pub struct RenderPass<S> {
    token: EpochToken,
    epoch: RenderEpoch,
    container: SharedPageStack<S>,
    scale: f32,
    regions: Vec<AnnotationRegion>,
    builder: OverlayBuilder,
}

impl<S: DrawSurface> RenderPass<S> {
    pub fn token(&self) -> EpochToken {
        self.token
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Whether no newer pass has started.
    pub fn is_current(&self) -> bool {
        self.epoch.is_current(self.token)
    }

    fn superseded(&self, stage: &str) -> RenderOutcome {
        log::debug!(
            "Render pass {} superseded {}, discarding",
            self.token.get(),
            stage
        );
        RenderOutcome::Superseded
    }

    /// Load the document and render every page in order.
    ///
    /// Missing or empty bytes render nothing. A document the backend cannot
    /// open is an error. A page that fails is logged and skipped.
    pub async fn run<B, F>(
        self,
        document: Option<&[u8]>,
        backend: &B,
        factory: &mut F,
    ) -> Result<RenderOutcome, RenderError>
    where
        B: PdfBackend,
        F: SurfaceFactory<Surface = S>,
    {
        let Some(bytes) = document.filter(|b| !b.is_empty()) else {
            log::debug!("No PDF document");
            return Ok(RenderOutcome::NoDocument);
        };

        let doc = backend.load(bytes).await.inspect_err(|e| {
            log::error!("PDF load failed: {}", e);
        })?;
        if !self.is_current() {
            return Ok(self.superseded("after load"));
        }

        let total = doc.page_count();
        self.container.borrow_mut().set_page_count(total);

        let mut rendered = 0usize;
        let mut failed = Vec::new();

        for i in 0..total {
            let page = PageIndex::from_zero_based(i);
            match self.render_one(&doc, page, factory).await {
                Ok(Some(done)) => {
                    // Only the current pass may touch the container
                    if !self.is_current() {
                        return Ok(self.superseded("mid-pass"));
                    }
                    self.container.borrow_mut().push(done);
                    rendered += 1;
                }
                Ok(None) => return Ok(self.superseded("mid-pass")),
                Err(_) if !self.is_current() => return Ok(self.superseded("mid-pass")),
                Err(error) => {
                    log::error!("Skipping page {}: {}", page, error);
                    failed.push(PageFailure { page, error });
                }
            }
        }

        log::info!(
            "Rendered {}/{} pages at scale {:.2} ({} failed)",
            rendered,
            total,
            self.scale,
            failed.len()
        );
        Ok(RenderOutcome::from_pages(rendered, failed, total))
    }

    /// Render one page; `Ok(None)` if the pass went stale while awaiting.
    async fn render_one<D, F>(
        &self,
        doc: &D,
        page: PageIndex,
        factory: &mut F,
    ) -> Result<Option<RenderedPage<S>>, PageError>
    where
        D: PdfDocumentSource,
        F: SurfaceFactory<Surface = S>,
    {
        let geometry = doc.page_size(page)?.scaled(self.scale);
        let (width, height) = geometry.to_pixels();
        let mut surface = factory.create_surface(width, height)?;

        let raster = doc.render_page(page, self.scale).await?;
        if !self.is_current() {
            return Ok(None);
        }

        surface.draw_image(
            &raster,
            PixelRect::new(0.0, 0.0, width as f32, height as f32),
        );
        let overlay = self
            .builder
            .build_for_page(&self.regions, page, geometry);
        overlay.draw(&mut surface, SceneTransform::IDENTITY);
        log::debug!(
            "Page {} rendered {}x{} with {} highlights",
            page,
            width,
            height,
            overlay.len()
        );

        Ok(Some(RenderedPage {
            page,
            geometry,
            surface,
        }))
    }
}
