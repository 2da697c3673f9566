//! Highlight overlays: which regions land on a surface, and how they are drawn.
//!
//! Overlays keep the input order of regions. Later regions draw on top of
//! earlier ones; there is no sorting or deduplication.

use hlview_canvas::{Color, DrawSurface, PixelRect, SceneTransform};

use crate::coords::{YAxis, map_region};
use crate::model::{AnnotationRegion, PageIndex, SurfaceGeometry};

/// How a highlight is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighlightStyle {
    /// Outline only, with a line width in surface pixels
    Stroke { width: f32 },
    /// Translucent fill with the given alpha
    Fill { alpha: f32 },
}

/// A highlight rectangle ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    /// Rectangle in surface space (before any scene transform)
    pub rect: PixelRect,
    /// Final paint color, alpha included
    pub color: Color,
    pub style: HighlightStyle,
}

impl Highlight {
    /// Paint onto a surface under a scene transform.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, transform: SceneTransform) {
        let rect = transform.apply_rect(self.rect);
        match self.style {
            HighlightStyle::Stroke { width } => {
                surface.stroke_rect(rect, self.color, transform.apply_length(width));
            }
            HighlightStyle::Fill { .. } => surface.fill_rect(rect, self.color),
        }
    }
}

/// An ordered list of highlights for one surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub items: Vec<Highlight>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Highlight) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Highlight> {
        self.items.iter()
    }

    /// Draw every highlight in order.
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, transform: SceneTransform) {
        for item in &self.items {
            item.draw(surface, transform);
        }
        log::trace!("Drew {} highlights", self.items.len());
    }
}

/// Regions whose `page` equals `page`, in input order.
pub fn regions_for_page(
    regions: &[AnnotationRegion],
    page: PageIndex,
) -> impl Iterator<Item = &AnnotationRegion> {
    regions.iter().filter(move |r| r.is_on_page(page))
}

/// Turns regions into highlights for a given surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayBuilder {
    axis: YAxis,
    style: HighlightStyle,
}

impl OverlayBuilder {
    pub fn new(axis: YAxis, style: HighlightStyle) -> Self {
        Self { axis, style }
    }

    /// Image viewer defaults: top-down Y, outlined.
    pub fn image(stroke_width: f32) -> Self {
        Self::new(YAxis::TopDown, HighlightStyle::Stroke {
            width: stroke_width,
        })
    }

    /// PDF viewer defaults: bottom-up Y, translucent fill.
    pub fn pdf(alpha: f32) -> Self {
        Self::new(YAxis::BottomUp, HighlightStyle::Fill { alpha })
    }

    /// Override the Y-axis convention.
    pub fn with_axis(mut self, axis: YAxis) -> Self {
        self.axis = axis;
        self
    }

    pub fn axis(&self) -> YAxis {
        self.axis
    }

    fn highlight(&self, region: &AnnotationRegion, geometry: SurfaceGeometry) -> Option<Highlight> {
        let rect = map_region(region, geometry, self.axis)?;
        let base = Color::from(region.color);
        let color = match self.style {
            HighlightStyle::Stroke { .. } => base,
            HighlightStyle::Fill { alpha } => base.with_alpha(alpha),
        };
        Some(Highlight {
            rect,
            color,
            style: self.style,
        })
    }

    /// Build highlights for every region that has a box, ignoring pages.
    pub fn build<'a>(
        &self,
        regions: impl IntoIterator<Item = &'a AnnotationRegion>,
        geometry: SurfaceGeometry,
    ) -> Overlay {
        let mut overlay = Overlay::new();
        let mut skipped = 0usize;
        for region in regions {
            match self.highlight(region, geometry) {
                Some(h) => overlay.push(h),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::trace!("Skipped {} regions without a bbox", skipped);
        }
        overlay
    }

    /// Build highlights for the regions on one page.
    pub fn build_for_page(
        &self,
        regions: &[AnnotationRegion],
        page: PageIndex,
        geometry: SurfaceGeometry,
    ) -> Overlay {
        self.build(regions_for_page(regions, page), geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, Rgb};
    use hlview_canvas::{DrawCommand, RecordingSurface};

    fn region(page: u32, x1: f32) -> AnnotationRegion {
        AnnotationRegion::new(BBox::new(x1, 10.0, x1 + 5.0, 20.0), Rgb::new(200, 0, 0))
            .on_page(PageIndex::new(page).unwrap())
    }

    #[test]
    fn test_regions_for_page_preserves_order() {
        let regions = vec![region(1, 1.0), region(2, 2.0), region(1, 3.0), region(1, 4.0)];
        let on_one: Vec<f32> = regions_for_page(&regions, PageIndex::FIRST)
            .map(|r| r.bbox.unwrap().x1)
            .collect();
        assert_eq!(on_one, vec![1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_page_regions_never_leak() {
        let regions = vec![region(1, 1.0), region(2, 2.0), region(3, 3.0)];
        let g = SurfaceGeometry::new(100.0, 100.0);
        let builder = OverlayBuilder::pdf(0.5);
        for page in 1..=3 {
            let overlay = builder.build_for_page(&regions, PageIndex::new(page).unwrap(), g);
            assert_eq!(overlay.len(), 1);
            assert_eq!(overlay.items[0].rect.x, page as f32);
        }
        let none = builder.build_for_page(&regions, PageIndex::new(4).unwrap(), g);
        assert!(none.is_empty());
    }

    #[test]
    fn test_regions_without_page_not_on_any_page() {
        let regions = vec![AnnotationRegion::new(
            BBox::new(0.0, 0.0, 1.0, 1.0),
            Rgb::new(0, 0, 0),
        )];
        let overlay = OverlayBuilder::pdf(0.5).build_for_page(
            &regions,
            PageIndex::FIRST,
            SurfaceGeometry::new(10.0, 10.0),
        );
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_absent_bbox_never_draws() {
        let regions = vec![
            AnnotationRegion::without_bbox(Rgb::new(1, 2, 3)).on_page(PageIndex::FIRST),
            region(1, 5.0),
        ];
        let overlay = OverlayBuilder::pdf(0.5).build_for_page(
            &regions,
            PageIndex::FIRST,
            SurfaceGeometry::new(100.0, 100.0),
        );
        let mut surface = RecordingSurface::new(100, 100);
        overlay.draw(&mut surface, SceneTransform::IDENTITY);
        assert_eq!(surface.commands().len(), 1);
    }

    #[test]
    fn test_image_overlay_ignores_pages_and_strokes() {
        let regions = vec![region(1, 1.0), region(7, 2.0)];
        let overlay = OverlayBuilder::image(2.0).build(&regions, SurfaceGeometry::new(100.0, 100.0));
        let mut surface = RecordingSurface::new(100, 100);
        overlay.draw(&mut surface, SceneTransform::new(2.0, 0.0, 0.0));

        assert_eq!(surface.commands().len(), 2);
        match &surface.commands()[0] {
            DrawCommand::StrokeRect { rect, color, width } => {
                assert_eq!(*width, 4.0);
                assert_eq!(color.to_css(), "rgb(200, 0, 0)");
                assert_eq!(rect.x, 2.0);
            }
            other => panic!("expected stroke, got {:?}", other),
        }
    }

    #[test]
    fn test_pdf_fill_is_translucent() {
        let overlay = OverlayBuilder::pdf(0.5).build_for_page(
            &[region(1, 0.0)],
            PageIndex::FIRST,
            SurfaceGeometry::new(100.0, 100.0),
        );
        assert_eq!(overlay.items[0].color.to_css(), "rgba(200, 0, 0, 0.5)");
        assert_eq!(overlay.items[0].rect.y, 80.0);
    }
}
