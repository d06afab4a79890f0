//! Rectangle shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, TwoPointRecord};
use crate::geometry;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle spanned by two opposite corners.
///
/// The corners are stored as drawn; `start` (`x,y`) need not be the top-left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TwoPointRecord", into = "TwoPointRecord")]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Corner where the gesture started (the drag anchor).
    pub start: Point,
    /// Opposite corner.
    pub end: Point,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle from two opposite corners.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            style: ShapeStyle::default(),
        }
    }

    /// Replace the style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Get as a normalized kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }
}

impl From<TwoPointRecord> for Rectangle {
    fn from(record: TwoPointRecord) -> Self {
        Self {
            id: record.id,
            start: record.anchor(),
            end: record.other(),
            style: record.style,
        }
    }
}

impl From<Rectangle> for TwoPointRecord {
    fn from(rect: Rectangle) -> Self {
        TwoPointRecord::new(rect.id, rect.start, rect.end, rect.style)
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn contains_point(&self, point: Point) -> bool {
        geometry::point_in_corners(point, self.start, self.end)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn anchor(&self) -> Point {
        self.start
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}
