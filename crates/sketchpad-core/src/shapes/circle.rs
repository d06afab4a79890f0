//! Circle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, TwoPointRecord};
use crate::geometry;
use kurbo::{BezPath, Circle as KurboCircle, Point, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A circle defined by its center (`x,y`) and a point on its rim (`x2,y2`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TwoPointRecord", into = "TwoPointRecord")]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Center point (the drag anchor).
    pub center: Point,
    /// Any point on the circumference.
    pub rim: Point,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Circle {
    /// Create a new circle.
    pub fn new(center: Point, rim: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            rim,
            style: ShapeStyle::default(),
        }
    }

    /// Replace the style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Distance from center to rim.
    pub fn radius(&self) -> f64 {
        self.center.distance(self.rim)
    }

    /// Get as a kurbo Circle.
    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(self.center, self.radius())
    }
}

impl From<TwoPointRecord> for Circle {
    fn from(record: TwoPointRecord) -> Self {
        Self {
            id: record.id,
            center: record.anchor(),
            rim: record.other(),
            style: record.style,
        }
    }
}

impl From<Circle> for TwoPointRecord {
    fn from(circle: Circle) -> Self {
        TwoPointRecord::new(circle.id, circle.center, circle.rim, circle.style)
    }
}

impl ShapeTrait for Circle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn contains_point(&self, point: Point) -> bool {
        geometry::point_in_circle(point, self.center, self.rim)
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn anchor(&self) -> Point {
        self.center
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
        self.rim += delta;
    }
}
