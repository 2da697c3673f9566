//! Default values shared by both viewers.

/// Multiplicative step for image zoom in/out.
pub const IMAGE_ZOOM_FACTOR: f32 = 1.2;

/// Stroke width of image highlights, in stage pixels before scaling.
pub const IMAGE_STROKE_WIDTH: f32 = 2.0;

/// Container size assumed when the host cannot report one.
pub const DEFAULT_CONTAINER_SIZE: (f32, f32) = (500.0, 500.0);

/// Initial PDF render scale.
pub const PDF_INITIAL_SCALE: f32 = 1.5;

/// Smallest PDF render scale.
pub const PDF_MIN_SCALE: f32 = 0.5;

/// Largest PDF render scale.
pub const PDF_MAX_SCALE: f32 = 3.0;

/// Additive step per PDF zoom action.
pub const PDF_SCALE_STEP: f32 = 0.25;

/// Vertical gap between stacked PDF pages, in pixels.
pub const PDF_PAGE_SPACING: f32 = 16.0;

/// Fill alpha of PDF highlights.
pub const PDF_HIGHLIGHT_ALPHA: f32 = 0.5;

/// Normalized coordinate space extent (bbox values run 0..=100).
pub const NORMALIZED_EXTENT: f32 = 100.0;
