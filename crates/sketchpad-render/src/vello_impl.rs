//! Vello-based renderer implementation.

use crate::paint::ShapePaint;
use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, Rect};
use peniko::Fill;
use sketchpad_core::shapes::Shape;
use vello::Scene;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Fill (if any) then stroke a single shape.
    fn render_shape(&mut self, shape: &Shape, transform: Affine) {
        let paint = ShapePaint::from_shape(shape);
        if let Some(fill) = paint.fill {
            self.scene
                .fill(Fill::NonZero, transform, fill, None, &paint.path);
        }
        self.scene
            .stroke(&paint.stroke, transform, paint.stroke_color, None, &paint.path);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        // Shapes are stored in surface pixels, so no view transform applies.
        let transform = Affine::IDENTITY;

        let viewport = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);
        self.scene.fill(
            Fill::NonZero,
            transform,
            ctx.background_color,
            None,
            &viewport,
        );

        for shape in ctx.canvas.scene.iter() {
            self.render_shape(shape, transform);
        }

        // The shape being drawn goes on top of everything committed.
        if let Some(preview) = ctx.canvas.preview() {
            self.render_shape(&preview, transform);
        }
    }
}
