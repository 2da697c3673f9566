//! Pixel-space rectangles and the scene transform applied on top of them.

/// A rectangle in surface pixel space.
///
/// Width and height may be negative when the source box was inverted;
/// backends call [`PixelRect::normalized`] before rasterizing, which matches
/// how a 2D canvas treats negative extents.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle with non-negative extent covering the same area.
    pub fn normalized(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check whether the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Check if a point lies inside the (normalized) rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let r = self.normalized();
        x >= r.x && x < r.right() && y >= r.y && y < r.bottom()
    }
}

/// Uniform scale followed by a translation: `screen = translate + scale * p`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl SceneTransform {
    pub const IDENTITY: SceneTransform = SceneTransform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn new(scale: f32, translate_x: f32, translate_y: f32) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Map a point.
    pub fn apply_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.translate_x + self.scale * x,
            self.translate_y + self.scale * y,
        )
    }

    /// Map a rectangle; extents scale, origin maps as a point.
    pub fn apply_rect(&self, rect: PixelRect) -> PixelRect {
        let (x, y) = self.apply_point(rect.x, rect.y);
        PixelRect::new(x, y, rect.width * self.scale, rect.height * self.scale)
    }

    /// Map a line width.
    pub fn apply_length(&self, length: f32) -> f32 {
        length * self.scale
    }
}

impl Default for SceneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_flips_negative_extent() {
        let r = PixelRect::new(10.0, 10.0, -4.0, -6.0).normalized();
        assert_eq!(r, PixelRect::new(6.0, 4.0, 4.0, 6.0));
    }

    #[test]
    fn test_contains_half_open() {
        let r = PixelRect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(9.9, 9.9));
        assert!(!r.contains(10.0, 5.0));
    }

    #[test]
    fn test_transform_rect() {
        let t = SceneTransform::new(2.0, 5.0, -5.0);
        let r = t.apply_rect(PixelRect::new(1.0, 1.0, 3.0, 4.0));
        assert_eq!(r, PixelRect::new(7.0, -3.0, 6.0, 8.0));
        assert_eq!(t.apply_length(2.0), 4.0);
    }
}
