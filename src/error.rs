//! Error types for decoding inputs and rendering surfaces.

use hlview_canvas::SurfaceError;
use thiserror::Error;

/// The document bytes could not be turned into something renderable.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The host string is not valid base64
    #[error("Invalid base64 document: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// The image decoded but has no pixels
    #[error("Image has zero width or height")]
    EmptyImage,

    /// The PDF backend rejected the document
    #[error("Failed to load PDF: {message}")]
    Pdf {
        /// Backend error description
        message: String,
    },
}

impl DecodeError {
    /// Create a PDF load error with a message.
    pub fn pdf(message: impl Into<String>) -> Self {
        Self::Pdf {
            message: message.into(),
        }
    }
}

/// A render pass failed as a whole.
///
/// Per-page failures of a PDF pass are not errors; they are reported in
/// [`crate::render::RenderOutcome::Partial`].
#[derive(Error, Debug)]
pub enum RenderError {
    /// Decoding the document failed
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The output surface could not be created
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

/// The host region list could not be parsed.
#[derive(Error, Debug)]
pub enum RegionParseError {
    /// Not JSON at all
    #[error("Region list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// One element of the array has the wrong shape
    #[error("Region {index} is malformed: {source}")]
    InvalidRegion {
        /// Position of the element in the array
        index: usize,
        /// Underlying deserialization error
        source: serde_json::Error,
    },
}
