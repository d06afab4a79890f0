//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use sketchpad_core::canvas::Canvas;

/// Everything a backend needs to paint one frame of the drawing surface.
pub struct RenderContext<'a> {
    /// Committed shapes plus any in-progress preview.
    pub canvas: &'a Canvas,
    /// Surface size in physical pixels; shapes use the same units.
    pub viewport_size: Size,
    /// Color the whole surface is cleared to before painting shapes.
    pub background_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Frame over a white surface.
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            viewport_size,
            background_color: Color::WHITE,
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }
}

/// Trait for rendering backends.
///
/// A frame is always rebuilt from scratch: the background, then every shape
/// in scene order, then the shape being drawn on top.
pub trait Renderer: Send + Sync {
    /// Rebuild the backend's command buffer for `ctx`.
    fn build_scene(&mut self, ctx: &RenderContext);
}
