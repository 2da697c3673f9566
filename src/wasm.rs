//! Browser entry point: canvas-backed surfaces, a PDF backend that defers
//! rasterization to a host JS object, and the exported highlighters.

use std::cell::RefCell;
use std::rc::Rc;

use hlview_canvas::{Color, DrawSurface, PixelRect, RasterImage, SurfaceError, SurfaceFactory};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, ImageData};

use crate::config::ViewerConfig;
use crate::error::DecodeError;
use crate::model::{AnnotationRegion, PageIndex, SurfaceGeometry};
use crate::render::{
    ImageViewer, PageError, PdfBackend, PdfDocumentSource, PdfViewer, RenderOutcome,
};
use crate::source::{decode_document, parse_regions};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let level = ViewerConfig::default().log_level.to_level_filter();
    if let Some(level) = level.to_level() {
        if let Err(e) = console_log::init_with_level(level) {
            web_sys::console::log_1(&format!("Logger init failed: {}", e).into());
        }
    }
    log::info!("hlview WASM started");
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SurfaceError> {
    canvas
        .get_context("2d")
        .map_err(|e| SurfaceError::ContextUnavailable(format!("{:?}", e)))?
        .ok_or_else(|| SurfaceError::ContextUnavailable("no 2d context".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| SurfaceError::ContextUnavailable("not a 2d context".into()))
}

/// A `<canvas>` element with its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = context_2d(&canvas)?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn clear(&self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    /// Copy a raster into an offscreen canvas so it can be drawn scaled.
    fn staging_canvas(&self, image: &RasterImage) -> Result<HtmlCanvasElement, JsValue> {
        let document = self
            .canvas
            .owner_document()
            .ok_or_else(|| JsValue::from_str("canvas has no document"))?;
        let staging: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        staging.set_width(image.width());
        staging.set_height(image.height());
        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(image.rgba()),
            image.width(),
            image.height(),
        )?;
        context_2d(&staging).map_err(to_js)?.put_image_data(&data, 0.0, 0.0)?;
        Ok(staging)
    }
}

impl DrawSurface for CanvasSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Color, line_width: f32) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke_rect(
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
    }

    fn draw_image(&mut self, image: &RasterImage, dest: PixelRect) {
        let result = self.staging_canvas(image).and_then(|staging| {
            self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                &staging,
                dest.x as f64,
                dest.y as f64,
                dest.width as f64,
                dest.height as f64,
            )
        });
        if let Err(e) = result {
            log::error!("Canvas draw_image failed: {:?}", e);
        }
    }
}

/// Creates detached canvases in a document.
pub struct CanvasFactory {
    document: Document,
}

impl CanvasFactory {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl SurfaceFactory for CanvasFactory {
    type Surface = CanvasSurface;

    fn create_surface(&mut self, width: u32, height: u32) -> Result<CanvasSurface, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSize { width, height });
        }
        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")
            .map_err(|e| SurfaceError::Backend(format!("{:?}", e)))?
            .dyn_into()
            .map_err(|_| SurfaceError::Backend("element is not a canvas".into()))?;
        canvas.set_width(width);
        canvas.set_height(height);
        CanvasSurface::new(canvas)
    }
}

/// Image viewer bound to a page canvas.
#[wasm_bindgen]
pub struct ImageHighlighter {
    viewer: ImageViewer,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl ImageHighlighter {
    /// Bind to `canvas`; its current size is the container size.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ImageHighlighter, JsValue> {
        let config = ViewerConfig::default().image;
        if canvas.width() == 0 || canvas.height() == 0 {
            let (w, h) = config.default_container_geometry().to_pixels();
            canvas.set_width(w);
            canvas.set_height(h);
        }
        let container = SurfaceGeometry::from_pixels(canvas.width(), canvas.height());
        let surface = CanvasSurface::new(canvas).map_err(to_js)?;
        Ok(Self {
            viewer: ImageViewer::with_container(config, container),
            surface,
        })
    }

    /// Replace the image (base64 or data URL) and the word boxes (JSON array).
    pub fn set_inputs(&mut self, image_base64: &str, words_json: &str) -> Result<(), JsValue> {
        let regions = parse_regions(words_json).map_err(to_js)?;
        let outcome = self
            .viewer
            .set_inputs_base64(image_base64, &regions)
            .map_err(to_js)?;
        log::debug!("Image inputs set: {:?}", outcome);
        self.redraw();
        Ok(())
    }

    pub fn zoom_in(&mut self) -> f32 {
        let zoom = self.viewer.zoom_in();
        self.redraw();
        zoom
    }

    pub fn zoom_out(&mut self) -> f32 {
        let zoom = self.viewer.zoom_out();
        self.redraw();
        zoom
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.viewer.pan_by(dx, dy);
        self.redraw();
    }

    pub fn zoom_percent(&self) -> u32 {
        self.viewer.zoom_percent()
    }

    /// Resize the canvas and refit the image.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.canvas().set_width(width);
        self.surface.canvas().set_height(height);
        self.viewer.resize(SurfaceGeometry::from_pixels(width, height));
        self.redraw();
    }
}

impl ImageHighlighter {
    fn redraw(&mut self) {
        self.surface.clear();
        self.viewer.draw_onto(&mut self.surface);
    }
}

#[wasm_bindgen]
extern "C" {
    /// Host object that rasterizes PDF pages, typically a thin pdf.js wrapper.
    ///
    /// `load(bytes)` resolves to an array of `[width, height]` pairs, one per
    /// page, at scale 1. `renderPage(page, scale)` takes a 1-based page and
    /// resolves to an `ImageData`.
    pub type JsPdfRasterizer;

    #[wasm_bindgen(method)]
    fn load(this: &JsPdfRasterizer, bytes: &[u8]) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = renderPage)]
    fn render_page(this: &JsPdfRasterizer, page: u32, scale: f32) -> js_sys::Promise;
}

fn js_message(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// [`PdfBackend`] over a [`JsPdfRasterizer`].
pub struct JsPdfBackend {
    rasterizer: JsPdfRasterizer,
}

impl JsPdfBackend {
    pub fn new(rasterizer: JsPdfRasterizer) -> Self {
        Self { rasterizer }
    }
}

fn page_sizes(value: &JsValue) -> Result<Vec<SurfaceGeometry>, DecodeError> {
    if !js_sys::Array::is_array(value) {
        return Err(DecodeError::pdf("rasterizer load() did not return an array"));
    }
    js_sys::Array::from(value)
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            let pair = js_sys::Array::from(&pair);
            match (pair.get(0).as_f64(), pair.get(1).as_f64()) {
                (Some(w), Some(h)) if w > 0.0 && h > 0.0 => {
                    Ok(SurfaceGeometry::new(w as f32, h as f32))
                }
                _ => Err(DecodeError::pdf(format!("page {} has no valid size", i + 1))),
            }
        })
        .collect()
}

pub struct JsPdfDocument<'a> {
    rasterizer: &'a JsPdfRasterizer,
    sizes: Vec<SurfaceGeometry>,
}

impl PdfDocumentSource for JsPdfDocument<'_> {
    fn page_count(&self) -> usize {
        self.sizes.len()
    }

    fn page_size(&self, page: PageIndex) -> Result<SurfaceGeometry, PageError> {
        page.to_zero_based()
            .and_then(|i| self.sizes.get(i))
            .copied()
            .ok_or_else(|| PageError::Raster(format!("no page {}", page)))
    }

    async fn render_page(&self, page: PageIndex, scale: f32) -> Result<RasterImage, PageError> {
        let value = JsFuture::from(self.rasterizer.render_page(page.get(), scale))
            .await
            .map_err(|e| PageError::Raster(js_message(&e)))?;
        let data: ImageData = value
            .dyn_into()
            .map_err(|_| PageError::Raster("renderPage() did not return ImageData".into()))?;
        Ok(RasterImage::from_rgba8(
            data.data().0,
            data.width(),
            data.height(),
        )?)
    }
}

impl PdfBackend for JsPdfBackend {
    type Document<'a> = JsPdfDocument<'a>;

    async fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<JsPdfDocument<'a>, DecodeError> {
        let value = JsFuture::from(self.rasterizer.load(bytes))
            .await
            .map_err(|e| DecodeError::pdf(js_message(&e)))?;
        Ok(JsPdfDocument {
            rasterizer: &self.rasterizer,
            sizes: page_sizes(&value)?,
        })
    }
}

/// PDF viewer that renders page canvases into a container element.
#[wasm_bindgen]
pub struct PdfHighlighter {
    viewer: Rc<RefCell<PdfViewer<CanvasSurface>>>,
    backend: Rc<JsPdfBackend>,
    container: Element,
    dom: Document,
    document: Option<Rc<[u8]>>,
    regions: Vec<AnnotationRegion>,
}

#[wasm_bindgen]
impl PdfHighlighter {
    /// Render into `container`; pages are appended as `<canvas>` children.
    #[wasm_bindgen(constructor)]
    pub fn new(container: Element, rasterizer: JsPdfRasterizer) -> Result<PdfHighlighter, JsValue> {
        let dom = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container has no document"))?;
        Ok(Self {
            viewer: Rc::new(RefCell::new(PdfViewer::new(ViewerConfig::default().pdf))),
            backend: Rc::new(JsPdfBackend::new(rasterizer)),
            container,
            dom,
            document: None,
            regions: Vec::new(),
        })
    }

    /// Replace the document (base64 or data URL) and the highlights (JSON array).
    pub fn set_inputs(&mut self, pdf_base64: &str, highlights_json: &str) -> Result<(), JsValue> {
        self.regions = parse_regions(highlights_json).map_err(to_js)?;
        self.document = decode_document(pdf_base64).map_err(to_js)?.map(Rc::from);
        let scale = self.viewer.borrow().viewport().scale();
        self.start_pass(scale);
        Ok(())
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.viewer.borrow_mut().zoom_in();
        self.tick();
        self.scale()
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.viewer.borrow_mut().zoom_out();
        self.tick();
        self.scale()
    }

    /// Start a rerender if the scale changed and the rerender delay has
    /// passed. Hosts with a nonzero delay call this from a timer.
    pub fn tick(&mut self) {
        let due = self
            .viewer
            .borrow_mut()
            .viewport_mut()
            .take_rerender(web_time::Instant::now());
        if let Some(scale) = due {
            self.start_pass(scale);
        }
    }

    /// Report the container's scroll offset; returns the current page.
    pub fn on_scroll(&mut self, scroll_top: f32) -> u32 {
        let mut viewer = self.viewer.borrow_mut();
        if let Some(event) = viewer.on_scroll(scroll_top) {
            log::trace!("{:?}", event);
        }
        viewer.viewport().current_page().get()
    }

    pub fn scale(&self) -> f32 {
        self.viewer.borrow().viewport().scale()
    }

    pub fn current_page(&self) -> u32 {
        self.viewer.borrow().viewport().current_page().get()
    }

    pub fn page_count(&self) -> usize {
        self.viewer.borrow().page_count()
    }
}

impl PdfHighlighter {
    fn start_pass(&mut self, scale: f32) {
        let pass = self.viewer.borrow_mut().begin_pass_at(&self.regions, scale);
        self.container.set_inner_html("");

        let viewer = Rc::clone(&self.viewer);
        let backend = Rc::clone(&self.backend);
        let container = self.container.clone();
        let document = self.document.clone();
        let mut factory = CanvasFactory::new(self.dom.clone());
        wasm_bindgen_futures::spawn_local(async move {
            match pass.run(document.as_deref(), &*backend, &mut factory).await {
                Ok(RenderOutcome::Superseded) => {}
                Ok(outcome) => {
                    log::debug!("PDF pass finished: {:?}", outcome);
                    attach_pages(&viewer.borrow(), &container);
                }
                Err(e) => log::error!("PDF render failed: {}", e),
            }
        });
    }
}

fn attach_pages(viewer: &PdfViewer<CanvasSurface>, container: &Element) {
    let pages = viewer.pages();
    let style = format!("display:block;margin-bottom:{}px", pages.spacing());
    for page in pages.pages() {
        let canvas = page.surface.canvas();
        let attached = canvas
            .set_attribute("style", &style)
            .and_then(|_| container.append_child(canvas));
        if let Err(e) = attached {
            log::error!("Failed to attach page {}: {:?}", page.page, e);
        }
    }
}
