//! Normalized annotation space to surface pixel space.
//!
//! Annotation boxes are given in a 0-100 space relative to the surface.
//! X always grows to the right. Y depends on where the coordinates came from:
//! image annotations grow downward like the canvas, PDF annotations grow
//! upward from the bottom edge of the page and must be flipped.

use hlview_canvas::PixelRect;
use serde::{Deserialize, Serialize};

use crate::constants::NORMALIZED_EXTENT;
use crate::model::{AnnotationRegion, BBox, SurfaceGeometry};

/// Direction of the Y axis in annotation space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YAxis {
    /// `y = 0` is the top edge (image annotations)
    #[default]
    TopDown,
    /// `y = 0` is the bottom edge (PDF annotations)
    BottomUp,
}

/// Map a normalized box onto a surface.
///
/// No clamping: boxes outside 0-100 land outside the surface, and an inverted
/// box yields a negative extent.
pub fn map_bbox(bbox: &BBox, geometry: SurfaceGeometry, axis: YAxis) -> PixelRect {
    let sx = geometry.width / NORMALIZED_EXTENT;
    let sy = geometry.height / NORMALIZED_EXTENT;

    let y = match axis {
        YAxis::TopDown => bbox.y1 * sy,
        YAxis::BottomUp => geometry.height - bbox.y2 * sy,
    };

    PixelRect::new(bbox.x1 * sx, y, bbox.width() * sx, bbox.height() * sy)
}

/// Map a region, or `None` if it has no box.
pub fn map_region(
    region: &AnnotationRegion,
    geometry: SurfaceGeometry,
    axis: YAxis,
) -> Option<PixelRect> {
    region.bbox.as_ref().map(|b| map_bbox(b, geometry, axis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rgb;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_top_down_identity_at_100() {
        let bbox = BBox::new(12.0, 34.0, 56.0, 78.0);
        let r = map_bbox(&bbox, SurfaceGeometry::new(100.0, 100.0), YAxis::TopDown);
        assert_eq!(r, PixelRect::new(12.0, 34.0, 44.0, 44.0));
    }

    #[test]
    fn test_top_down_scales_per_axis() {
        let bbox = BBox::new(10.0, 20.0, 30.0, 60.0);
        let r = map_bbox(&bbox, SurfaceGeometry::new(400.0, 200.0), YAxis::TopDown);
        assert!(approx_eq(r.x, 40.0));
        assert!(approx_eq(r.y, 40.0));
        assert!(approx_eq(r.width, 80.0));
        assert!(approx_eq(r.height, 80.0));
    }

    #[test]
    fn test_bottom_up_flips_y() {
        let bbox = BBox::new(10.0, 20.0, 30.0, 60.0);
        let g = SurfaceGeometry::new(918.0, 1188.0);
        let r = map_bbox(&bbox, g, YAxis::BottomUp);

        assert!(approx_eq(r.y, 1188.0 - 60.0 * 1188.0 / 100.0));
        assert!(approx_eq(r.x, 10.0 * 918.0 / 100.0));
        assert!(approx_eq(r.height, 40.0 * 1188.0 / 100.0));

        let top_down = map_bbox(&bbox, g, YAxis::TopDown);
        assert!(!approx_eq(top_down.y, r.y));
        assert!(approx_eq(top_down.x, r.x));
        assert!(approx_eq(top_down.width, r.width));
    }

    #[test]
    fn test_bottom_up_box_at_bottom_edge() {
        // A box touching y = 0 in PDF space ends at the bottom of the canvas
        let r = map_bbox(
            &BBox::new(0.0, 0.0, 100.0, 10.0),
            SurfaceGeometry::new(100.0, 100.0),
            YAxis::BottomUp,
        );
        assert!(approx_eq(r.bottom(), 100.0));
    }

    #[test]
    fn test_no_clamping() {
        let r = map_bbox(
            &BBox::new(-10.0, 90.0, 120.0, 150.0),
            SurfaceGeometry::new(100.0, 100.0),
            YAxis::TopDown,
        );
        assert!(r.x < 0.0);
        assert!(r.bottom() > 100.0);
    }

    #[test]
    fn test_inverted_box_negative_extent() {
        let r = map_bbox(
            &BBox::new(50.0, 50.0, 40.0, 45.0),
            SurfaceGeometry::new(100.0, 100.0),
            YAxis::TopDown,
        );
        assert!(r.width < 0.0);
        assert!(r.height < 0.0);
    }

    #[test]
    fn test_region_without_bbox() {
        let region = AnnotationRegion::without_bbox(Rgb::new(1, 1, 1));
        assert!(map_region(&region, SurfaceGeometry::new(10.0, 10.0), YAxis::TopDown).is_none());
    }
}
