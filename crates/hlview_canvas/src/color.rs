//! RGBA color with 8-bit channels and a floating point alpha.

use std::fmt;

/// Highlight color.
///
/// Channels are stored as bytes because annotation colors arrive as
/// `[r, g, b]` triples in 0-255. Alpha stays a float (0.0-1.0) so that
/// CSS strings such as `rgba(255, 0, 0, 0.5)` round-trip exactly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Neutral gray shown around a fitted image.
    pub const CANVAS_GRAY: Color = Color::rgb(0xf8, 0xf8, 0xf8);

    /// Opaque color from three channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Color with explicit alpha, clamped to 0.0-1.0.
    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Return the same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Alpha as a byte, rounded.
    pub fn alpha_u8(&self) -> u8 {
        (self.a * 255.0).round() as u8
    }

    /// Whether the color is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// CSS color string: `rgb(r, g, b)` when opaque, `rgba(r, g, b, a)` otherwise.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_opaque() {
        assert_eq!(Color::rgb(255, 0, 10).to_css(), "rgb(255, 0, 10)");
    }

    #[test]
    fn test_css_translucent() {
        assert_eq!(
            Color::rgb(1, 2, 3).with_alpha(0.5).to_css(),
            "rgba(1, 2, 3, 0.5)"
        );
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(Color::rgba(0, 0, 0, 3.0).a, 1.0);
        assert_eq!(Color::rgba(0, 0, 0, -1.0).a, 0.0);
        assert_eq!(Color::rgb(0, 0, 0).with_alpha(0.5).alpha_u8(), 128);
    }
}
