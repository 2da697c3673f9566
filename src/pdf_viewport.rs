//! Zoom and scroll state for the PDF viewer.
//!
//! Unlike the image viewer, PDF zoom is a discrete render scale: each step
//! invalidates every page surface, which must then be rasterized again at the
//! new scale. Rapid steps can be coalesced with a rerender delay.

use std::time::Duration;

use web_time::Instant;

use crate::constants::{PDF_INITIAL_SCALE, PDF_MAX_SCALE, PDF_MIN_SCALE, PDF_SCALE_STEP};
use crate::model::PageIndex;

/// Allowed render scales and the step between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleBounds {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ScaleBounds {
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max)
    }
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            min: PDF_MIN_SCALE,
            max: PDF_MAX_SCALE,
            step: PDF_SCALE_STEP,
        }
    }
}

/// Vertical layout box of one rendered page inside the scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub page: PageIndex,
    pub top: f32,
    pub height: f32,
}

impl PageBox {
    /// Whether `offset` falls in `[top, top + height)`.
    pub fn contains(&self, offset: f32) -> bool {
        offset >= self.top && offset < self.top + self.height
    }
}

/// The first page whose span contains the scroll offset, or page 1.
///
/// Boxes are scanned top to bottom. Offsets that fall in the spacing between
/// pages, or before anything was laid out, also report page 1.
pub fn visible_page(boxes: &[PageBox], scroll_offset: f32) -> PageIndex {
    boxes
        .iter()
        .find(|b| b.contains(scroll_offset))
        .map(|b| b.page)
        .unwrap_or(PageIndex::FIRST)
}

/// Notifications for the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PdfEvent {
    /// The tracked visible page changed
    PageChanged { from: PageIndex, to: PageIndex },
    /// The render scale changed; page surfaces are stale
    ScaleChanged { from: f32, to: f32 },
}

/// PDF zoom and current-page state.
#[derive(Debug, Clone)]
pub struct PdfViewport {
    scale: f32,
    /// Scale the current page surfaces were rendered at
    rendered_scale: Option<f32>,
    bounds: ScaleBounds,
    rerender_delay: Duration,
    last_change: Option<Instant>,
    current_page: PageIndex,
}

impl PdfViewport {
    pub fn new(initial_scale: f32, bounds: ScaleBounds) -> Self {
        Self {
            scale: bounds.clamp(initial_scale),
            rendered_scale: None,
            bounds,
            rerender_delay: Duration::ZERO,
            last_change: None,
            current_page: PageIndex::FIRST,
        }
    }

    /// Coalesce scale changes that arrive closer together than `delay`.
    pub fn with_rerender_delay(mut self, delay: Duration) -> Self {
        self.rerender_delay = delay;
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    pub fn current_page(&self) -> PageIndex {
        self.current_page
    }

    /// Step the scale up, clamped at the maximum.
    pub fn zoom_in(&mut self) -> Option<PdfEvent> {
        self.set_scale(self.scale + self.bounds.step)
    }

    /// Step the scale down, clamped at the minimum.
    pub fn zoom_out(&mut self) -> Option<PdfEvent> {
        self.set_scale(self.scale - self.bounds.step)
    }

    /// Set the scale (clamped). Returns an event only when it actually changed.
    pub fn set_scale(&mut self, scale: f32) -> Option<PdfEvent> {
        self.set_scale_at(scale, Instant::now())
    }

    /// Like [`Self::set_scale`] with an explicit clock reading.
    pub fn set_scale_at(&mut self, scale: f32, now: Instant) -> Option<PdfEvent> {
        let scale = self.bounds.clamp(scale);
        if scale == self.scale {
            log::trace!("PDF scale already {:.2}", scale);
            return None;
        }
        let from = self.scale;
        self.scale = scale;
        self.last_change = Some(now);
        log::debug!("PDF scale {:.2} -> {:.2}", from, scale);
        Some(PdfEvent::ScaleChanged { from, to: scale })
    }

    /// Whether page surfaces do not match the current scale.
    pub fn needs_rerender(&self) -> bool {
        self.rendered_scale != Some(self.scale)
    }

    /// Scale to rerender at, once the rerender delay has passed since the last change.
    ///
    /// Returns `None` when surfaces are current or the delay is still running.
    /// The caller is expected to start a render pass with the returned scale.
    pub fn take_rerender(&mut self, now: Instant) -> Option<f32> {
        if !self.needs_rerender() {
            return None;
        }
        if let Some(changed) = self.last_change {
            if now.saturating_duration_since(changed) < self.rerender_delay {
                return None;
            }
        }
        self.mark_rendered(self.scale);
        Some(self.scale)
    }

    /// Record that page surfaces are being rendered at `scale`.
    pub fn mark_rendered(&mut self, scale: f32) {
        self.rendered_scale = Some(scale);
    }

    /// Track the visible page for a scroll offset.
    pub fn on_scroll(&mut self, boxes: &[PageBox], scroll_offset: f32) -> Option<PdfEvent> {
        let page = visible_page(boxes, scroll_offset);
        if page == self.current_page {
            return None;
        }
        let from = self.current_page;
        self.current_page = page;
        log::debug!("Visible page {} -> {}", from, page);
        Some(PdfEvent::PageChanged { from, to: page })
    }
}

impl Default for PdfViewport {
    fn default() -> Self {
        Self::new(PDF_INITIAL_SCALE, ScaleBounds::default())
    }
}
