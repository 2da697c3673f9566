//! Pan/zoom state for the image viewer.
//!
//! The image sits in a draggable group inside a stage. Zooming scales the
//! stage about the center of the visible viewport (not the cursor); dragging
//! moves the group. A point `p` in group space lands on screen at
//! `stage.pan + stage.zoom * (group_offset + p)`.

use hlview_canvas::SceneTransform;
use serde::{Deserialize, Serialize};

use crate::model::SurfaceGeometry;

/// Stage transform: uniform zoom and a pan offset in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Transform {
    /// Create a new transform with the given zoom and pan.
    pub fn new(zoom: f32, pan_x: f32, pan_y: f32) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Create an identity transform (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Stage-space point currently shown at a screen position.
    pub fn screen_to_stage(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pan_x) / self.zoom, (y - self.pan_y) / self.zoom)
    }

    /// Screen position of a stage-space point.
    pub fn stage_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (self.pan_x + x * self.zoom, self.pan_y + y * self.zoom)
    }

    /// Change zoom while keeping the stage point under `(anchor_x, anchor_y)` fixed.
    ///
    /// The algorithm:
    /// 1. Find the stage-space point at the anchor with the old zoom
    /// 2. Apply the new zoom
    /// 3. Recompute pan so that same point lands on the anchor again
    pub fn zoom_at(&self, new_zoom: f32, anchor_x: f32, anchor_y: f32) -> Transform {
        let (px, py) = self.screen_to_stage(anchor_x, anchor_y);
        Transform {
            zoom: new_zoom,
            pan_x: anchor_x - px * new_zoom,
            pan_y: anchor_y - py * new_zoom,
        }
    }

    /// Change zoom anchored at the center of a viewport of the given size.
    pub fn zoom_about_center(&self, new_zoom: f32, viewport: SurfaceGeometry) -> Transform {
        self.zoom_at(new_zoom, viewport.width / 2.0, viewport.height / 2.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Optional zoom bounds. Both `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoomLimits {
    #[serde(default)]
    pub min: Option<f32>,
    #[serde(default)]
    pub max: Option<f32>,
}

impl ZoomLimits {
    pub const UNBOUNDED: ZoomLimits = ZoomLimits {
        min: None,
        max: None,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn apply(&self, zoom: f32) -> f32 {
        let zoom = self.min.map_or(zoom, |min| zoom.max(min));
        self.max.map_or(zoom, |max| zoom.min(max))
    }
}

/// Image viewer viewport: stage transform plus the dragged group offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageViewport {
    stage: Transform,
    group_offset: (f32, f32),
    viewport: SurfaceGeometry,
    factor: f32,
    limits: ZoomLimits,
}

impl ImageViewport {
    pub fn new(viewport: SurfaceGeometry, factor: f32, limits: ZoomLimits) -> Self {
        Self {
            stage: Transform::identity(),
            group_offset: (0.0, 0.0),
            viewport,
            factor,
            limits,
        }
    }

    pub fn stage(&self) -> Transform {
        self.stage
    }

    pub fn zoom(&self) -> f32 {
        self.stage.zoom
    }

    /// Zoom as a rounded percentage, as shown next to the zoom buttons.
    pub fn zoom_percent(&self) -> u32 {
        (self.stage.zoom * 100.0).round().max(0.0) as u32
    }

    pub fn viewport(&self) -> SurfaceGeometry {
        self.viewport
    }

    pub fn group_offset(&self) -> (f32, f32) {
        self.group_offset
    }

    /// Multiply zoom by the step factor, anchored at the viewport center.
    pub fn zoom_in(&mut self) -> f32 {
        self.set_zoom(self.stage.zoom * self.factor)
    }

    /// Divide zoom by the step factor, anchored at the viewport center.
    pub fn zoom_out(&mut self) -> f32 {
        self.set_zoom(self.stage.zoom / self.factor)
    }

    /// Set zoom directly (limits apply), anchored at the viewport center.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        let zoom = self.limits.apply(zoom);
        self.stage = self.stage.zoom_about_center(zoom, self.viewport);
        log::debug!("Image zoom {:.3} ({}%)", zoom, self.zoom_percent());
        zoom
    }

    /// Drag the group by a screen-space delta.
    ///
    /// The group lives inside the scaled stage, so the delta is divided by
    /// the zoom to keep the image under the pointer.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.group_offset.0 += dx / self.stage.zoom;
        self.group_offset.1 += dy / self.stage.zoom;
    }

    /// Place the group, e.g. at the centering offset of a freshly fitted image.
    pub fn set_group_offset(&mut self, x: f32, y: f32) {
        self.group_offset = (x, y);
    }

    /// Update the viewport size (container resize). Zoom and pan are kept.
    pub fn resize(&mut self, viewport: SurfaceGeometry) {
        self.viewport = viewport;
    }

    /// Transform from group space to screen space.
    pub fn scene_transform(&self) -> SceneTransform {
        let (gx, gy) = self.group_offset;
        let (tx, ty) = self.stage.stage_to_screen(gx, gy);
        SceneTransform::new(self.stage.zoom, tx, ty)
    }
}
