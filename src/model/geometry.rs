//! Rendered surface sizes and fit-within placement.

/// Size of one rendered page or image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub width: f32,
    pub height: f32,
}

impl SurfaceGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Geometry of an integer-sized raster.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// Integer backing size; fractional pixels are truncated like a canvas
    /// assigning a float to its `width` attribute.
    pub fn to_pixels(&self) -> (u32, u32) {
        (self.width.max(0.0) as u32, self.height.max(0.0) as u32)
    }

    /// Scale both dimensions.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Where a fitted image sits inside its container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitPlacement {
    /// Size of the fitted image
    pub geometry: SurfaceGeometry,
    /// Offset of the fitted image's top-left corner inside the container
    pub offset: (f32, f32),
}

/// Fit `intrinsic` inside `container`, preserving aspect ratio, centered.
///
/// A wider-than-container image spans the full width; otherwise it spans
/// the full height.
pub fn fit_within(intrinsic: SurfaceGeometry, container: SurfaceGeometry) -> FitPlacement {
    let aspect = intrinsic.aspect_ratio();
    let geometry = if aspect > container.aspect_ratio() {
        SurfaceGeometry::new(container.width, container.width / aspect)
    } else {
        SurfaceGeometry::new(container.height * aspect, container.height)
    };
    let offset = (
        (container.width - geometry.width) / 2.0,
        (container.height - geometry.height) / 2.0,
    );
    FitPlacement { geometry, offset }
}
