//! Turns pointer gestures into scene mutations.
//!
//! A gesture is either drawing a new shape or dragging an existing one. All
//! transient state (drag offset, which shape is moving, the start of the
//! gesture) lives here, never on the shapes themselves, so the scene can be
//! serialized as-is at any moment.

use crate::input::{MouseButton, PointerEvent};
use crate::scene::Scene;
use crate::shapes::{Freehand, Shape, ShapeId, ShapeKind};
use crate::tools::ToolSettings;
use kurbo::{Point, Vec2};

/// State of the current pointer gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    /// No button held.
    #[default]
    Idle,
    /// Drawing a new shape.
    Drawing {
        /// Kind captured when the gesture began.
        kind: ShapeKind,
        start: Point,
        current: Point,
        /// Freehand strokes are added to the scene immediately; this is their id.
        stroke: Option<ShapeId>,
    },
    /// Moving an existing shape.
    Dragging {
        id: ShapeId,
        /// Pointer position minus the shape's anchor at press time.
        offset: Vec2,
    },
}

/// Pointer-driven state machine over {idle, drawing, dragging}.
///
/// Every handler returns whether the surface needs repainting.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    gesture: Gesture,
}

impl InteractionController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture.
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Check if no gesture is in progress.
    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    /// Shape currently being dragged, if any.
    pub fn drag_target(&self) -> Option<ShapeId> {
        match self.gesture {
            Gesture::Dragging { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Route a pointer event. Only the left button draws or drags.
    pub fn handle_event(
        &mut self,
        event: PointerEvent,
        scene: &mut Scene,
        settings: &ToolSettings,
    ) -> bool {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(scene, settings, position),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => self.pointer_up(scene, settings, position),
            PointerEvent::Move { position } => self.pointer_move(scene, position),
            PointerEvent::Leave => self.cancel(),
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => false,
        }
    }

    /// Begin a gesture: drag the topmost shape under the pointer, or start
    /// drawing when nothing draggable is hit.
    pub fn pointer_down(&mut self, scene: &mut Scene, settings: &ToolSettings, point: Point) -> bool {
        if !self.is_idle() {
            log::debug!("Press during an unfinished gesture; discarding it");
            self.gesture = Gesture::Idle;
        }

        if let Some(id) = scene.hit_test(point) {
            if let Some(shape) = scene.get(id) {
                let offset = point - shape.anchor();
                log::debug!("Dragging {:?} shape {}", shape.kind(), id);
                self.gesture = Gesture::Dragging { id, offset };
                return true;
            }
        }

        let kind = settings.mode;
        let stroke = match kind {
            ShapeKind::Freehand => {
                let freehand = Freehand::new(point, settings.style());
                Some(scene.add(Shape::Freehand(freehand)))
            }
            _ => None,
        };
        self.gesture = Gesture::Drawing {
            kind,
            start: point,
            current: point,
            stroke,
        };
        stroke.is_some()
    }

    /// Continue the gesture.
    pub fn pointer_move(&mut self, scene: &mut Scene, point: Point) -> bool {
        match self.gesture {
            Gesture::Idle => false,
            Gesture::Drawing {
                kind, start, stroke, ..
            } => {
                self.gesture = Gesture::Drawing {
                    kind,
                    start,
                    current: point,
                    stroke,
                };
                if let Some(id) = stroke {
                    if !scene.extend_path(id, point) {
                        log::warn!("Freehand stroke {} vanished mid-gesture", id);
                        self.gesture = Gesture::Idle;
                    }
                }
                true
            }
            Gesture::Dragging { id, offset } => {
                let Some(anchor) = scene.get(id).map(Shape::anchor) else {
                    log::warn!("Dragged shape {} vanished mid-gesture", id);
                    self.gesture = Gesture::Idle;
                    return true;
                };
                let new_anchor = point - offset;
                scene.translate(id, new_anchor - anchor);
                true
            }
        }
    }

    /// Finish the gesture, committing a two-point shape if one was being drawn.
    pub fn pointer_up(&mut self, scene: &mut Scene, settings: &ToolSettings, point: Point) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => false,
            Gesture::Drawing {
                kind,
                start,
                stroke: None,
                ..
            } => {
                if let Some(shape) = Shape::from_points(kind, start, point, settings.style()) {
                    let id = scene.add(shape);
                    log::debug!("Committed {:?} {}", kind, id);
                }
                true
            }
            Gesture::Drawing { stroke: Some(_), .. } | Gesture::Dragging { .. } => true,
        }
    }

    /// Abort the gesture. An uncommitted shape is discarded; a drag stops
    /// where it is; a freehand stroke keeps the points drawn so far.
    pub fn cancel(&mut self) -> bool {
        let was_active = !self.is_idle();
        self.gesture = Gesture::Idle;
        was_active
    }

    /// The two-point shape being drawn right now, styled with the current
    /// settings. Nothing is returned for freehand strokes since they already
    /// live in the scene.
    pub fn preview(&self, settings: &ToolSettings) -> Option<Shape> {
        match self.gesture {
            Gesture::Drawing {
                kind,
                start,
                current,
                stroke: None,
            } => Shape::from_points(kind, start, current, settings.style()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Line, Rectangle, SerializableColor};

    fn settings(mode: ShapeKind) -> ToolSettings {
        ToolSettings {
            mode,
            ..ToolSettings::default()
        }
    }

    fn drag(
        controller: &mut InteractionController,
        scene: &mut Scene,
        settings: &ToolSettings,
        from: Point,
        to: Point,
    ) {
        controller.pointer_down(scene, settings, from);
        controller.pointer_move(scene, from.midpoint(to));
        controller.pointer_move(scene, to);
        controller.pointer_up(scene, settings, to);
    }

    #[test]
    fn test_draw_rectangle_commits_on_release() {
        let mut scene = Scene::new();
        let mut controller = InteractionController::new();
        let mut settings = settings(ShapeKind::Rectangle);
        settings.fill_color = SerializableColor::from_hex("#ff0000").unwrap();

        controller.pointer_down(&mut scene, &settings, Point::new(10.0, 10.0));
        controller.pointer_move(&mut scene, Point::new(30.0, 30.0));
        assert!(scene.is_empty(), "nothing is committed before release");
        assert!(controller.preview(&settings).is_some());

        controller.pointer_up(&mut scene, &settings, Point::new(50.0, 40.0));
        assert!(controller.is_idle());
        assert_eq!(scene.len(), 1);

        let shape = &scene.shapes()[0];
        assert_eq!(shape.style().fill_color, SerializableColor::rgb(255, 0, 0));
        assert!(shape.contains_point(Point::new(20.0, 20.0)));
        assert!(!shape.contains_point(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_preview_tracks_pointer() {
        let mut scene = Scene::new();
        let mut controller = InteractionController::new();
        let settings = settings(ShapeKind::Line);

        controller.pointer_down(&mut scene, &settings, Point::new(0.0, 0.0));
        controller.pointer_move(&mut scene, Point::new(40.0, 0.0));
        match controller.preview(&settings) {
            Some(Shape::Line(line)) => {
                assert_eq!(line.start, Point::new(0.0, 0.0));
                assert_eq!(line.end, Point::new(40.0, 0.0));
            }
            other => panic!("unexpected preview: {other:?}"),
        }
    }

    #[test]
    fn test_draw_circle() {
        let mut scene = Scene::new();
        let mut controller = InteractionController::new();
        let settings = settings(ShapeKind::Circle);
        drag(
            &mut controller,
            &mut scene,
            &settings,
            Point::new(100.0, 100.0),
            Point::new(130.0, 100.0),
        );
        match &scene.shapes()[0] {
            Shape::Circle(circle) => assert!((circle.radius() - 30.0).abs() < 1e-9),
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_freehand_appended_immediately() {
        let mut scene = Scene::new();
        let mut controller = InteractionController::new();
        let settings = settings(ShapeKind::Freehand);

        controller.pointer_down(&mut scene, &settings, Point::new(1.0, 1.0));
        assert_eq!(scene.len(), 1);
        assert!(controller.preview(&settings).is_none());

        controller.pointer_move(&mut scene, Point::new(2.0, 2.0));
        controller.pointer_move(&mut scene, Point::new(3.0, 3.0));
        controller.pointer_up(&mut scene, &settings, Point::new(3.0, 3.0));

        assert_eq!(scene.len(), 1);
        match &scene.shapes()[0] {
            Shape::Freehand(f) => assert_eq!(f.len(), 3),
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_press_in_overlap_drags_topmost() {
        let mut scene = Scene::new();
        let a = scene.add(Shape::Rectangle(Rectangle::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
        )));
        let b = scene.add(Shape::Circle(Circle::new(
            Point::new(100.0, 100.0),
            Point::new(130.0, 100.0),
        )));
        let mut controller = InteractionController::new();
        controller.pointer_down(&mut scene, &settings(ShapeKind::Line), Point::new(90.0, 90.0));
        assert_eq!(controller.drag_target(), Some(b));
        assert_ne!(controller.drag_target(), Some(a));
    }

    #[test]
    fn test_drag_preserves_size() {
        let mut scene = Scene::new();
        let id = scene.add(Shape::Rectangle(Rectangle::new(
            Point::new(10.0, 10.0),
            Point::new(50.0, 40.0),
        )));
        let mut controller = InteractionController::new();
        let settings = settings(ShapeKind::Rectangle);
        drag(
            &mut controller,
            &mut scene,
            &settings,
            Point::new(20.0, 20.0),
            Point::new(120.0, 70.0),
        );

        assert_eq!(scene.len(), 1, "dragging must not create shapes");
        match scene.get(id) {
            Some(Shape::Rectangle(rect)) => {
                assert_eq!(rect.start, Point::new(110.0, 60.0));
                assert_eq!(rect.end, Point::new(150.0, 90.0));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
        assert!(controller.is_idle());
    }

    #[test]
    fn test_drag_line_translates_both_ends() {
        let mut scene = Scene::new();
        let id = scene.add(Shape::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        )));
        let mut controller = InteractionController::new();
        let settings = settings(ShapeKind::Line);
        drag(
            &mut controller,
            &mut scene,
            &settings,
            Point::new(50.0, 2.0),
            Point::new(60.0, 12.0),
        );
        match scene.get(id) {
            Some(Shape::Line(line)) => {
                assert_eq!(line.start, Point::new(10.0, 10.0));
                assert_eq!(line.end, Point::new(110.0, 10.0));
            }
            other => panic!("unexpected shape: {other:?}"),
        }
    }

    #[test]
    fn test_press_on_freehand_starts_new_drawing() {
        let mut scene = Scene::new();
        let mut free = Freehand::new(Point::new(0.0, 0.0), ToolSettings::default().style());
        free.add_point(Point::new(10.0, 10.0));
        let free_id = scene.add(Shape::Freehand(free.clone()));

        let mut controller = InteractionController::new();
        let settings = settings(ShapeKind::Rectangle);
        controller.pointer_down(&mut scene, &settings, Point::new(0.0, 0.0));
        assert!(controller.drag_target().is_none());
        assert!(matches!(controller.gesture(), Gesture::Drawing { .. }));

        controller.pointer_move(&mut scene, Point::new(40.0, 40.0));
        controller.pointer_up(&mut scene, &settings, Point::new(40.0, 40.0));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(free_id), Some(&Shape::Freehand(free)));
    }

    #[test]
    fn test_settings_change_does_not_restyle() {
        let mut scene = Scene::new();
        let mut controller = InteractionController::new();
        let mut settings = settings(ShapeKind::Rectangle);
        drag(
            &mut controller,
            &mut scene,
            &settings,
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        );

        settings.stroke_color = SerializableColor::rgb(0, 128, 0);
        settings.stroke_width = 9.0;
        settings.dashed = true;

        let style = scene.shapes()[0].style();
        assert_eq!(style.stroke_color, SerializableColor::black());
        assert!((style.stroke_width - 2.0).abs() < f64::EPSILON);
        assert!(!style.dashed);
    }

    #[test]
    fn test_mode_captured_at_press() {
        let mut scene = Scene::new();
        let mut controller = InteractionController::new();
        let mut settings = settings(ShapeKind::Line);
        controller.pointer_down(&mut scene, &settings, Point::new(0.0, 0.0));
        settings.mode = ShapeKind::Circle;
        controller.pointer_up(&mut scene, &settings, Point::new(10.0, 0.0));
        assert_eq!(scene.shapes()[0].kind(), ShapeKind::Line);
    }

    #[test]
    fn test_idle_moves_are_noops() {
        let mut scene = Scene::new();
        let mut controller = InteractionController::new();
        assert!(!controller.pointer_move(&mut scene, Point::new(1.0, 1.0)));
        assert!(!controller.pointer_up(&mut scene, &ToolSettings::default(), Point::new(1.0, 1.0)));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_cancel_discards_uncommitted_shape() {
        let mut scene = Scene::new();
        let mut controller = InteractionController::new();
        let settings = settings(ShapeKind::Rectangle);
        controller.pointer_down(&mut scene, &settings, Point::new(0.0, 0.0));
        controller.pointer_move(&mut scene, Point::new(10.0, 10.0));
        assert!(controller.handle_event(PointerEvent::Leave, &mut scene, &settings));
        assert!(controller.is_idle());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_right_button_ignored() {
        let mut scene = Scene::new();
        let mut controller = InteractionController::new();
        let settings = settings(ShapeKind::Freehand);
        let event = PointerEvent::Down {
            position: Point::new(1.0, 1.0),
            button: MouseButton::Right,
        };
        assert!(!controller.handle_event(event, &mut scene, &settings));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_clear_mid_drag_ends_gesture() {
        let mut scene = Scene::new();
        scene.add(Shape::Rectangle(Rectangle::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        )));
        let mut controller = InteractionController::new();
        controller.pointer_down(&mut scene, &ToolSettings::default(), Point::new(5.0, 5.0));
        scene.clear();
        controller.pointer_move(&mut scene, Point::new(6.0, 6.0));
        assert!(controller.is_idle());
    }
}
