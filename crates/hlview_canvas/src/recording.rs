//! A backend that records draw calls instead of rasterizing them.
//!
//! Used by tests and by hosts that replay commands onto their own canvas.

use crate::{Color, DrawSurface, PixelRect, RasterImage, SurfaceError, SurfaceFactory};

/// A draw call captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: PixelRect,
        color: Color,
    },
    StrokeRect {
        rect: PixelRect,
        color: Color,
        width: f32,
    },
    DrawImage {
        dest: PixelRect,
        /// Source raster size
        source: (u32, u32),
    },
}

/// Surface that stores every draw call in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Only the rectangle commands (fills and strokes), in draw order.
    pub fn rect_commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| !matches!(c, DrawCommand::DrawImage { .. }))
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color,
            width: line_width,
        });
    }

    fn draw_image(&mut self, image: &RasterImage, dest: PixelRect) {
        self.commands.push(DrawCommand::DrawImage {
            dest,
            source: (image.width(), image.height()),
        });
    }
}

/// Factory for [`RecordingSurface`] that can be told to fail specific creations.
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    /// 1-based creation ordinals that should fail
    fail_on: Vec<usize>,
    created: usize,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th call to `create_surface` (1-based) fail.
    pub fn fail_on_call(mut self, n: usize) -> Self {
        self.fail_on.push(n);
        self
    }

    /// Number of creation attempts so far, failed ones included.
    pub fn attempts(&self) -> usize {
        self.created
    }
}

impl SurfaceFactory for RecordingFactory {
    type Surface = RecordingSurface;

    fn create_surface(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<RecordingSurface, SurfaceError> {
        self.created += 1;
        if self.fail_on.contains(&self.created) {
            return Err(SurfaceError::ContextUnavailable(format!(
                "injected failure on creation {}",
                self.created
            )));
        }
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSize { width, height });
        }
        Ok(RecordingSurface::new(width, height))
    }
}
