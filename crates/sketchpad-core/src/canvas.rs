//! Runtime drawing surface state.

use crate::input::PointerEvent;
use crate::interaction::InteractionController;
use crate::scene::Scene;
use crate::shapes::Shape;
use crate::tools::ToolSettings;

/// Runtime canvas state: the scene plus everything needed to edit it.
///
/// Only `scene` is persisted. Tool settings and the in-progress gesture live
/// for the session.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Shapes on the surface.
    pub scene: Scene,
    /// Mode and style for new shapes.
    pub tools: ToolSettings,
    /// Pointer gesture state machine.
    pub interaction: InteractionController,
    /// Viewport size.
    pub viewport_size: kurbo::Size,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty scene.
    pub fn new() -> Self {
        Self::with_scene(Scene::new())
    }

    /// Create a canvas showing an existing scene.
    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            tools: ToolSettings::default(),
            interaction: InteractionController::new(),
            viewport_size: kurbo::Size::new(800.0, 600.0),
        }
    }

    /// Set the viewport size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport_size = kurbo::Size::new(width, height);
    }

    /// Feed a pointer event to the controller. Returns whether to repaint.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        self.interaction
            .handle_event(event, &mut self.scene, &self.tools)
    }

    /// Abort the current gesture. Returns whether anything was in progress.
    pub fn cancel_gesture(&mut self) -> bool {
        self.interaction.cancel()
    }

    /// Remove every shape and abort any gesture.
    pub fn clear(&mut self) {
        self.interaction.cancel();
        self.scene.clear();
    }

    /// Replace the scene wholesale, aborting any gesture first.
    pub fn replace_scene(&mut self, scene: Scene) {
        self.interaction.cancel();
        self.scene = scene;
    }

    /// Shape being drawn but not yet committed, if any.
    pub fn preview(&self) -> Option<Shape> {
        self.interaction.preview(&self.tools)
    }
}
