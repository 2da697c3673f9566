//! What a render pass reports back to the host.

use hlview_canvas::SurfaceError;

use crate::model::PageIndex;

/// Why a single page was skipped.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// No drawing surface could be acquired for the page
    #[error("Surface unavailable: {0}")]
    Surface(#[from] SurfaceError),

    /// The PDF backend failed to rasterize or measure the page
    #[error("Rasterization failed: {0}")]
    Raster(String),
}

/// A page that did not render.
#[derive(Debug)]
pub struct PageFailure {
    pub page: PageIndex,
    pub error: PageError,
}

/// Result of a render pass that did not fail as a whole.
#[derive(Debug)]
pub enum RenderOutcome {
    /// The input was empty; nothing was drawn
    NoDocument,
    /// Every surface rendered
    Complete {
        /// Number of surfaces rendered
        pages: usize,
    },
    /// Some pages were skipped
    Partial {
        rendered: usize,
        failed: Vec<PageFailure>,
        /// Page count of the document, including failed pages
        total: usize,
    },
    /// A newer pass started; this pass attached nothing further
    Superseded,
}

impl RenderOutcome {
    /// Build `Complete` or `Partial` from per-page results.
    pub fn from_pages(rendered: usize, failed: Vec<PageFailure>, total: usize) -> Self {
        if failed.is_empty() {
            RenderOutcome::Complete { pages: rendered }
        } else {
            RenderOutcome::Partial {
                rendered,
                failed,
                total,
            }
        }
    }

    /// Number of surfaces this pass produced.
    pub fn rendered(&self) -> usize {
        match self {
            RenderOutcome::Complete { pages } => *pages,
            RenderOutcome::Partial { rendered, .. } => *rendered,
            RenderOutcome::NoDocument | RenderOutcome::Superseded => 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, RenderOutcome::Complete { .. })
    }
}
