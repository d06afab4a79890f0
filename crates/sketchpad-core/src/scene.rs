//! The scene: every shape on the surface, in paint order.

use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when turning stored text back into a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Malformed scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Freehand shape at index {index} has no points")]
    EmptyPath { index: usize },
    #[error("Shape at index {index} has invalid stroke width {width}")]
    InvalidStrokeWidth { index: usize, width: f64 },
}

/// Ordered collection of shapes.
///
/// Insertion order doubles as z-order: later shapes paint over earlier ones
/// and win hit tests. Shapes are appended while drawing and mutated in place
/// while dragging; they are never reordered or removed one at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scene {
    shapes: Vec<Shape>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a shape on top of everything else.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.shapes.push(shape);
        id
    }

    /// Get a shape by ID.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// Move a shape by `delta`. Returns false if no such shape exists.
    pub fn translate(&mut self, id: ShapeId, delta: Vec2) -> bool {
        match self.get_mut(id) {
            Some(shape) => {
                shape.translate(delta);
                true
            }
            None => false,
        }
    }

    /// Append a point to a freehand stroke. Returns false if `id` is not a
    /// freehand shape in this scene.
    pub fn extend_path(&mut self, id: ShapeId, point: Point) -> bool {
        match self.get_mut(id).and_then(Shape::as_freehand_mut) {
            Some(freehand) => {
                freehand.add_point(point);
                true
            }
            None => false,
        }
    }

    /// Replace every shape at once (used by load).
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    /// Remove all shapes.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Shapes in paint order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    /// Shapes as a slice, in paint order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Topmost hit-testable shape containing `point`, if any.
    pub fn hit_test(&self, point: Point) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .filter(|s| s.is_hit_testable())
            .find(|s| s.contains_point(point))
            .map(Shape::id)
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Serialize the scene as a JSON array of shape records.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse and validate a JSON array of shape records.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let scene: Scene = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Check the invariants serde cannot express.
    fn validate(&self) -> Result<(), SceneError> {
        for (index, shape) in self.shapes.iter().enumerate() {
            let style = shape.style();
            if !style.has_valid_width() {
                return Err(SceneError::InvalidStrokeWidth {
                    index,
                    width: style.stroke_width,
                });
            }
            if let Shape::Freehand(freehand) = shape {
                if freehand.is_empty() {
                    return Err(SceneError::EmptyPath { index });
                }
            }
        }
        Ok(())
    }
}
