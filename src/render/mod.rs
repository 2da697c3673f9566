//! Surface rendering for both viewers.
//!
//! The image viewer composes one container-sized surface. The PDF viewer
//! rasterizes one surface per page into a page stack, sequentially, guarded
//! by a render epoch so that a superseded pass never attaches output.

mod epoch;
mod image_scene;
mod outcome;
mod page_stack;
mod pdf;
#[cfg(test)]
mod pipeline_tests;
#[cfg(feature = "pdfium")]
mod pdfium;

pub use epoch::{EpochToken, RenderEpoch};
pub use image_scene::{ImageScene, ImageViewer, decode_image};
pub use outcome::{PageError, PageFailure, RenderOutcome};
pub use page_stack::{PageStack, RenderedPage, SharedPageStack};
pub use pdf::{PdfBackend, PdfDocumentSource, PdfViewer, RenderPass};
#[cfg(feature = "pdfium")]
pub use pdfium::{PdfiumBackend, PdfiumDocument};
