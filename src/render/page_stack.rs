//! The scroll container that holds rendered PDF pages.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::{PageIndex, SurfaceGeometry};
use crate::pdf_viewport::PageBox;

/// One rendered page surface.
#[derive(Debug)]
pub struct RenderedPage<S> {
    pub page: PageIndex,
    pub geometry: SurfaceGeometry,
    pub surface: S,
}

/// Page surfaces stacked vertically in page order with fixed spacing.
#[derive(Debug)]
pub struct PageStack<S> {
    pages: Vec<RenderedPage<S>>,
    spacing: f32,
    /// Page count of the loaded document, failed pages included
    page_count: usize,
}

/// The container is shared between the viewer and its in-flight pass.
pub type SharedPageStack<S> = Rc<RefCell<PageStack<S>>>;

impl<S> PageStack<S> {
    pub fn new(spacing: f32) -> Self {
        Self {
            pages: Vec::new(),
            spacing,
            page_count: 0,
        }
    }

    /// Remove every page and forget the page count.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.page_count = 0;
    }

    pub fn push(&mut self, page: RenderedPage<S>) {
        self.pages.push(page);
    }

    pub fn pages(&self) -> &[RenderedPage<S>] {
        &self.pages
    }

    pub fn get(&self, page: PageIndex) -> Option<&RenderedPage<S>> {
        self.pages.iter().find(|p| p.page == page)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn set_page_count(&mut self, count: usize) {
        self.page_count = count;
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Layout boxes of the attached pages, top to bottom.
    pub fn layout(&self) -> Vec<PageBox> {
        let mut top = 0.0;
        self.pages
            .iter()
            .map(|p| {
                let b = PageBox {
                    page: p.page,
                    top,
                    height: p.geometry.height,
                };
                top += p.geometry.height + self.spacing;
                b
            })
            .collect()
    }

    /// Height of the scrollable content.
    pub fn content_height(&self) -> f32 {
        let heights: f32 = self.pages.iter().map(|p| p.geometry.height).sum();
        let gaps = self.pages.len().saturating_sub(1) as f32 * self.spacing;
        heights + gaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32, height: f32) -> RenderedPage<()> {
        RenderedPage {
            page: PageIndex::new(n).unwrap(),
            geometry: SurfaceGeometry::new(100.0, height),
            surface: (),
        }
    }

    #[test]
    fn test_layout_accumulates_spacing() {
        let mut stack = PageStack::new(16.0);
        stack.push(page(1, 800.0));
        stack.push(page(2, 600.0));
        stack.push(page(4, 900.0));

        let boxes = stack.layout();
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[1].top, 816.0);
        assert_eq!(boxes[2].top, 1432.0);
        assert_eq!(boxes[2].page.get(), 4);
        assert_eq!(stack.content_height(), 2332.0);
    }

    #[test]
    fn test_clear_resets_count() {
        let mut stack = PageStack::new(0.0);
        stack.set_page_count(3);
        stack.push(page(1, 10.0));
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.page_count(), 0);
    }
}
